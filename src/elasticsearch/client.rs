use crate::elasticsearch::cloud_id::cloud_id_to_url;
use crate::elasticsearch::model::{CatIndex, IlmExplainResponse};
use crate::utils::*;
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

/// The read-only calls the report needs from a cluster.
pub trait Cluster {
    fn ping(&self) -> Result<(), DsmError>;
    fn cat_indices(&self, pattern: &str) -> Result<Vec<CatIndex>, DsmError>;
    fn ilm_explain(&self, index: &str) -> Result<IlmExplainResponse, DsmError>;
}

pub struct ElasticsearchClient {
    client: reqwest::blocking::Client,
    settings: Settings,
    base_url: String,
}

impl ElasticsearchClient {
    pub fn new(settings: Settings) -> Result<Self, DsmError> {
        let base_url = match &settings.locator {
            Locator::CloudId(cloud_id) => cloud_id_to_url(cloud_id)?,
            Locator::Url(url) => url.trim_end_matches('/').to_string(),
        };
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("GET {}", url);
        add_auth(self.client.get(url), &self.settings)
    }
}

fn check_status(status: StatusCode, what: &str) -> Result<(), DsmError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(DsmError::AuthError)
    } else {
        Err(DsmError::ESError(format!(
            "Failed to {}. Status code: {}",
            what, status
        )))
    }
}

impl Cluster for ElasticsearchClient {
    fn ping(&self) -> Result<(), DsmError> {
        let url = format!("{}/", self.base_url);
        let response = add_auth(self.client.head(url), &self.settings).send()?;
        check_status(response.status(), "ping the cluster")
    }

    fn cat_indices(&self, pattern: &str) -> Result<Vec<CatIndex>, DsmError> {
        let response = self
            .get(&format!("_cat/indices/{}?format=json&h=index", pattern))
            .send()?;
        check_status(response.status(), "list indices")?;

        response
            .json()
            .map_err(|e| DsmError::ParseError(format!("Failed to parse indices: {}", e)))
    }

    fn ilm_explain(&self, index: &str) -> Result<IlmExplainResponse, DsmError> {
        let response = self.get(&format!("{}/_ilm/explain", index)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DsmError::IndexNotFound(index.to_string()));
        }
        check_status(response.status(), "explain lifecycle")?;

        response
            .json()
            .map_err(|e| DsmError::ParseError(format!("Failed to parse ILM explain: {}", e)))
    }
}

/// Why a connection attempt was given up.
#[derive(Debug, PartialEq)]
pub enum ConnectFailure {
    Auth,
    Network,
    Unexpected,
}

/// Classify and log the outcome of the liveness check.
fn check_ping(result: Result<(), DsmError>) -> Result<(), ConnectFailure> {
    match result {
        Ok(()) => Ok(()),
        Err(DsmError::AuthError) => {
            error!("Authentication failed. Check your API key.");
            Err(ConnectFailure::Auth)
        }
        Err(DsmError::NetworkError(e)) => {
            error!(
                "Connection error. Check your network connection or the cluster Cloud ID/URL: {}",
                e
            );
            Err(ConnectFailure::Network)
        }
        Err(e) => {
            warn!("Failed to connect to Elasticsearch.");
            error!("An unexpected error occurred during connection: {}", e);
            Err(ConnectFailure::Unexpected)
        }
    }
}

/// Build a client and check the cluster answers. Every failure is logged
/// and yields `None`.
pub fn connect(settings: Settings) -> Option<ElasticsearchClient> {
    let client = match ElasticsearchClient::new(settings) {
        Ok(client) => client,
        Err(e) => {
            error!("An unexpected error occurred during connection: {}", e);
            return None;
        }
    };

    check_ping(client.ping()).ok()?;
    info!("Connected to Elasticsearch at {}", client.base_url());
    Some(client)
}
