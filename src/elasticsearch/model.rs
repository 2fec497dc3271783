use serde::Deserialize;
use std::collections::HashMap;

/// One row of `_cat/indices?format=json&h=index`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CatIndex {
    pub index: Option<String>,
}

/// Body of `GET <index>/_ilm/explain`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct IlmExplainResponse {
    #[serde(default)]
    pub indices: HashMap<String, IlmIndexExplain>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct IlmIndexExplain {
    pub lifecycle_date_millis: Option<i64>,
}

impl IlmExplainResponse {
    /// `lifecycle_date_millis` of `index`, or of the only entry when the
    /// response is keyed under another name.
    pub fn lifecycle_date_millis(&self, index: &str) -> Option<i64> {
        match self.indices.get(index) {
            Some(explain) => explain.lifecycle_date_millis,
            None if self.indices.len() == 1 => self
                .indices
                .values()
                .next()
                .and_then(|explain| explain.lifecycle_date_millis),
            None => None,
        }
    }
}
