use crate::utils::DsmError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const DEFAULT_PORT: u16 = 443;

/// Turn an Elastic Cloud ID into the HTTPS endpoint of its Elasticsearch
/// node.
///
/// A Cloud ID looks like `<deployment>:<base64>`, the payload decoding to
/// `<host>[:<port>]$<es uuid>$<kibana uuid>`.
pub fn cloud_id_to_url(cloud_id: &str) -> Result<String, DsmError> {
    let (_, encoded) = cloud_id
        .split_once(':')
        .ok_or_else(|| DsmError::ConfigError("Cloud ID must look like <name>:<base64>".to_string()))?;

    let decoded = STANDARD.decode(encoded.trim())?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| DsmError::ConfigError("Cloud ID payload is not UTF-8".to_string()))?;

    let mut parts = decoded.split('$');
    let host = parts.next().unwrap_or_default();
    let es_uuid = parts.next().unwrap_or_default();
    if host.is_empty() || es_uuid.is_empty() {
        return Err(DsmError::ConfigError(
            "Cloud ID payload is missing the host or the Elasticsearch id".to_string(),
        ));
    }

    let (host, port) = match host.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| DsmError::ConfigError(format!("Invalid port in Cloud ID: {}", port)))?;
            (host, port)
        }
        None => (host, DEFAULT_PORT),
    };

    if port == DEFAULT_PORT {
        Ok(format!("https://{}.{}", es_uuid, host))
    } else {
        Ok(format!("https://{}.{}:{}", es_uuid, host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &str) -> String {
        format!("my-deployment:{}", STANDARD.encode(payload))
    }

    #[test]
    fn test_cloud_id_default_port() {
        let cloud_id = encode("us-east-1.aws.found.io$abc123$def456");
        assert_eq!(
            cloud_id_to_url(&cloud_id).unwrap(),
            "https://abc123.us-east-1.aws.found.io"
        );
    }

    #[test]
    fn test_cloud_id_explicit_443() {
        let cloud_id = encode("us-east-1.aws.found.io:443$abc123$def456");
        assert_eq!(
            cloud_id_to_url(&cloud_id).unwrap(),
            "https://abc123.us-east-1.aws.found.io"
        );
    }

    #[test]
    fn test_cloud_id_custom_port() {
        let cloud_id = encode("europe-west1.gcp.cloud.es.io:9243$abc123$def456");
        assert_eq!(
            cloud_id_to_url(&cloud_id).unwrap(),
            "https://abc123.europe-west1.gcp.cloud.es.io:9243"
        );
    }

    #[test]
    fn test_cloud_id_without_name() {
        assert!(cloud_id_to_url("bm90LWEtY2xvdWQtaWQ=").is_err());
    }

    #[test]
    fn test_cloud_id_bad_base64() {
        assert!(cloud_id_to_url("prod:***").is_err());
    }

    #[test]
    fn test_cloud_id_missing_uuid() {
        let cloud_id = encode("us-east-1.aws.found.io");
        assert!(cloud_id_to_url(&cloud_id).is_err());
    }
}
