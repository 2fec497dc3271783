// src/utils.rs
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CLOUD_ID_ENV: &str = "ELASTICSEARCH_CLOUD_ID";
pub const URL_ENV: &str = "ELASTICSEARCH_URL";
pub const API_KEY_ENV: &str = "ELASTICSEARCH_API_KEY";

#[derive(Deserialize, Clone, Default, Debug)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,
}

#[derive(Deserialize, Clone, Default, Debug, PartialEq)]
pub struct DefaultConfig {
    pub cloud_id: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Where the cluster lives: an Elastic Cloud deployment or a plain endpoint.
#[derive(Clone, Debug, PartialEq)]
pub enum Locator {
    CloudId(String),
    Url(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub locator: Locator,
    pub api_key: String,
}

//Custom Error
#[derive(Debug)]
pub enum DsmError {
    ConfigError(String),
    AuthError,
    NetworkError(String),
    ParseError(String),
    DateParseError(String),
    IOError(std::io::Error),
    IndexNotFound(String),
    ESError(String),
}

// Error conversions
impl From<std::io::Error> for DsmError {
    fn from(err: std::io::Error) -> Self {
        DsmError::IOError(err)
    }
}

impl From<reqwest::Error> for DsmError {
    fn from(err: reqwest::Error) -> Self {
        DsmError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for DsmError {
    fn from(err: serde_json::Error) -> Self {
        DsmError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for DsmError {
    fn from(err: toml::de::Error) -> Self {
        DsmError::ParseError(format!("TOML deserialization error: {}", err))
    }
}

impl From<base64::DecodeError> for DsmError {
    fn from(err: base64::DecodeError) -> Self {
        DsmError::ConfigError(format!("Cloud ID is not valid base64: {}", err))
    }
}

// Error display
impl std::fmt::Display for DsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DsmError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DsmError::AuthError => write!(f, "Authentication failed"),
            DsmError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DsmError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DsmError::DateParseError(msg) => write!(
                f,
                "Date error: {}\nSee accepted formats at https://docs.rs/dateparser/latest/dateparser/#accepted-date-formats",
                msg
            ),
            DsmError::IOError(err) => write!(f, "IO error: {}", err),
            DsmError::IndexNotFound(index) => write!(f, "Index not found: {}", index),
            DsmError::ESError(msg) => write!(f, "Elasticsearch error: {}", msg),
        }
    }
}

impl std::error::Error for DsmError {}

pub fn load_config(config_file: &Path) -> Result<Option<Config>, DsmError> {
    if config_file.exists() {
        let content = fs::read_to_string(config_file)?;
        let config = toml::from_str(&content)?;
        Ok(Some(config))
    } else {
        Ok(None)
    }
}

/// Values given on the command line, highest priority.
#[derive(Default, Clone, Debug)]
pub struct Overrides {
    pub cloud_id: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
}

// Empty strings count as unset, as they do for an unset variable in a .env file
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Merge command line, environment and config file, in that order.
    pub fn resolve<F>(
        overrides: &Overrides,
        env: F,
        file: Option<&Config>,
    ) -> Result<Settings, DsmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.map(|c| c.default.clone()).unwrap_or_default();

        let pick = |flag: &Option<String>, key: &str, stored: &Option<String>| {
            non_empty(flag.clone())
                .or_else(|| non_empty(env(key)))
                .or_else(|| non_empty(stored.clone()))
        };

        let cloud_id = pick(&overrides.cloud_id, CLOUD_ID_ENV, &file.cloud_id);
        let url = pick(&overrides.url, URL_ENV, &file.url);
        let api_key = pick(&overrides.api_key, API_KEY_ENV, &file.api_key);

        let locator = match (cloud_id, url) {
            (Some(cloud_id), _) => Locator::CloudId(cloud_id),
            (None, Some(url)) => Locator::Url(url),
            (None, None) => {
                return Err(DsmError::ConfigError(format!(
                    "No cluster configured. Set {} or {} (in the environment or a .env file).",
                    CLOUD_ID_ENV, URL_ENV
                )));
            }
        };

        let api_key = api_key.ok_or_else(|| {
            DsmError::ConfigError(format!(
                "No API key configured. Set {} (in the environment or a .env file).",
                API_KEY_ENV
            ))
        })?;

        Ok(Settings { locator, api_key })
    }
}

pub fn add_auth(
    request: reqwest::blocking::RequestBuilder,
    settings: &Settings,
) -> reqwest::blocking::RequestBuilder {
    request.header(
        reqwest::header::AUTHORIZATION,
        format!("ApiKey {}", settings.api_key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn file_config(cloud_id: Option<&str>, url: Option<&str>, api_key: Option<&str>) -> Config {
        Config {
            default: DefaultConfig {
                cloud_id: cloud_id.map(String::from),
                url: url.map(String::from),
                api_key: api_key.map(String::from),
            },
        }
    }

    #[test]
    fn test_resolve_from_env() {
        let env = env_of(&[(CLOUD_ID_ENV, "prod:abc"), (API_KEY_ENV, "key")]);
        let settings = Settings::resolve(&Overrides::default(), env, None).unwrap();
        assert_eq!(settings.locator, Locator::CloudId("prod:abc".to_string()));
        assert_eq!(settings.api_key, "key");
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let overrides = Overrides {
            api_key: Some("from-flag".to_string()),
            ..Default::default()
        };
        let env = env_of(&[(URL_ENV, "http://env:9200")]);
        let file = file_config(None, Some("http://file:9200"), Some("from-file"));
        let settings = Settings::resolve(&overrides, env, Some(&file)).unwrap();
        assert_eq!(settings.locator, Locator::Url("http://env:9200".to_string()));
        assert_eq!(settings.api_key, "from-flag");
    }

    #[test]
    fn test_cloud_id_wins_over_url() {
        let file = file_config(Some("prod:abc"), Some("http://localhost:9200"), Some("k"));
        let settings = Settings::resolve(&Overrides::default(), env_of(&[]), Some(&file)).unwrap();
        assert_eq!(settings.locator, Locator::CloudId("prod:abc".to_string()));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = env_of(&[(CLOUD_ID_ENV, ""), (API_KEY_ENV, "key")]);
        let file = file_config(None, Some("http://file:9200"), None);
        let settings = Settings::resolve(&Overrides::default(), env, Some(&file)).unwrap();
        assert_eq!(settings.locator, Locator::Url("http://file:9200".to_string()));
    }

    #[test]
    fn test_missing_locator() {
        let env = env_of(&[(API_KEY_ENV, "key")]);
        let result = Settings::resolve(&Overrides::default(), env, None);
        assert!(matches!(result, Err(DsmError::ConfigError(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let env = env_of(&[(URL_ENV, "http://localhost:9200")]);
        let result = Settings::resolve(&Overrides::default(), env, None);
        assert!(matches!(result, Err(DsmError::ConfigError(_))));
    }

    #[test]
    fn test_config_file_parses() {
        let config: Config = toml::from_str(
            "[default]\ncloud_id = \"prod:abc\"\napi_key = \"secret\"\n",
        )
        .unwrap();
        assert_eq!(config.default.cloud_id.as_deref(), Some("prod:abc"));
        assert_eq!(config.default.url, None);
    }

    #[test]
    fn test_load_missing_config_file() {
        let path = std::env::temp_dir().join("dsmerge-does-not-exist").join("config.toml");
        assert!(load_config(&path).unwrap().is_none());
    }
}
