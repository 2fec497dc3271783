//! In-memory `Cluster` for unit tests.
use crate::elasticsearch::client::Cluster;
use crate::elasticsearch::model::{CatIndex, IlmExplainResponse, IlmIndexExplain};
use crate::utils::DsmError;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeCluster {
    pub reachable: bool,
    pub fail_listing: bool,
    pub indices: Vec<String>,
    pub lifecycle: HashMap<String, Option<i64>>,
    /// Key the explain response uses instead of the requested index name.
    pub explain_key: Option<String>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeCluster {
    pub fn new(indices: &[&str]) -> Self {
        Self {
            reachable: true,
            indices: indices.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_lifecycle(mut self, index: &str, millis: Option<i64>) -> Self {
        self.lifecycle.insert(index.to_string(), millis);
        self
    }
}

impl Cluster for FakeCluster {
    fn ping(&self) -> Result<(), DsmError> {
        self.requests.borrow_mut().push("HEAD /".to_string());
        if self.reachable {
            Ok(())
        } else {
            Err(DsmError::NetworkError("connection refused".to_string()))
        }
    }

    fn cat_indices(&self, pattern: &str) -> Result<Vec<CatIndex>, DsmError> {
        self.requests
            .borrow_mut()
            .push(format!("GET _cat/indices/{}", pattern));
        if self.fail_listing {
            return Err(DsmError::ESError("Failed to list indices. Status code: 500".to_string()));
        }
        Ok(self
            .indices
            .iter()
            .map(|name| CatIndex {
                index: Some(name.clone()),
            })
            .collect())
    }

    fn ilm_explain(&self, index: &str) -> Result<IlmExplainResponse, DsmError> {
        self.requests
            .borrow_mut()
            .push(format!("GET {}/_ilm/explain", index));
        let millis = self
            .lifecycle
            .get(index)
            .ok_or_else(|| DsmError::IndexNotFound(index.to_string()))?;
        let key = self.explain_key.clone().unwrap_or_else(|| index.to_string());
        let mut indices = HashMap::new();
        indices.insert(
            key,
            IlmIndexExplain {
                lifecycle_date_millis: *millis,
            },
        );
        Ok(IlmExplainResponse { indices })
    }
}
