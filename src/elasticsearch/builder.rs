use serde_json::{Value, json};

/// Body of a `_reindex` request.
#[derive(Clone, Default)]
pub struct ReindexBuilder {
    sources: Vec<String>,
    as_list: bool,
    dest: String,
    create_only: bool,
}

impl ReindexBuilder {
    pub fn new(dest: &str) -> Self {
        Self {
            dest: dest.to_string(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, index: &str) -> Self {
        self.sources.push(index.to_string());
        self
    }

    /// Sources written as a list, however many there are.
    pub fn with_sources<S: AsRef<str>>(mut self, indices: &[S]) -> Self {
        self.as_list = true;
        self.sources
            .extend(indices.iter().map(|index| index.as_ref().to_string()));
        self
    }

    /// `op_type: create`: fail instead of overwriting documents already in
    /// the destination.
    pub fn create_only(mut self, create_only: bool) -> Self {
        self.create_only = create_only;
        self
    }

    pub fn build(self) -> Value {
        // A single source added with with_source is written as a plain string
        let index = match self.sources.as_slice() {
            [single] if !self.as_list => json!(single),
            many => json!(many),
        };

        let mut dest = json!({ "index": self.dest });
        if self.create_only {
            dest["op_type"] = json!("create");
        }

        json!({
            "source": { "index": index },
            "dest": dest,
        })
    }
}

/// Body of a `_data_stream/_modify` request.
#[derive(Clone)]
pub struct ModifyDataStreamBuilder {
    data_stream: String,
    actions: Vec<Value>,
}

impl ModifyDataStreamBuilder {
    pub fn new(data_stream: &str) -> Self {
        Self {
            data_stream: data_stream.to_string(),
            actions: Vec::new(),
        }
    }

    pub fn remove_backing_index(mut self, index: &str) -> Self {
        self.actions.push(json!({
            "remove_backing_index": {
                "data_stream": self.data_stream,
                "index": index,
            }
        }));
        self
    }

    pub fn add_backing_index(mut self, index: &str) -> Self {
        self.actions.push(json!({
            "add_backing_index": {
                "data_stream": self.data_stream,
                "index": index,
            }
        }));
        self
    }

    pub fn build(self) -> Value {
        json!({ "actions": self.actions })
    }
}

pub fn lifecycle_settings(origination_date_millis: i64) -> Value {
    json!({
        "index.lifecycle.indexing_complete": true,
        "index.lifecycle.origination_date": origination_date_millis,
    })
}

/// Move an index stuck on the hot rollover ERROR step to hot/complete.
pub fn ilm_move_past_rollover_error() -> Value {
    json!({
        "current_step": {
            "phase": "hot",
            "action": "rollover",
            "name": "ERROR",
        },
        "next_step": {
            "phase": "hot",
            "action": "complete",
        }
    })
}
