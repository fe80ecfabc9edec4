use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::FormSchema,
    form::{ErrorMap, FormSnapshot},
};

/// One field as described by the server after a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub name: String,
    /// Absent for secret fields.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub choices: Option<Value>,
    #[serde(default)]
    pub readonly: bool,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            default_value: None,
            label: None,
            kind: None,
            required: false,
            help: None,
            placeholder: None,
            choices: None,
            readonly: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// `value` when the server sent one, otherwise `defaultValue`, otherwise null.
    pub fn resolved(&self) -> Value {
        self.value
            .clone()
            .or_else(|| self.default_value.clone())
            .unwrap_or(Value::Null)
    }
}

/// Successful save payload: the authoritative field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SaveResponseRepr")]
pub struct SaveResponse {
    pub config: Vec<FieldRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SaveResponseRepr {
    Wrapped { config: Vec<FieldRecord> },
    Bare(Vec<FieldRecord>),
}

impl From<SaveResponseRepr> for SaveResponse {
    fn from(repr: SaveResponseRepr) -> Self {
        match repr {
            SaveResponseRepr::Wrapped { config } | SaveResponseRepr::Bare(config) => {
                SaveResponse { config }
            }
        }
    }
}

impl SaveResponse {
    pub fn new(config: Vec<FieldRecord>) -> Self {
        Self { config }
    }

    /// Builds the confirmed snapshot. Schema fields the server did not return
    /// become null; returned names outside the schema are ignored.
    pub fn reconcile(&self, schema: &FormSchema) -> FormSnapshot {
        let mut snapshot = FormSnapshot::empty(schema);
        for record in &self.config {
            if !snapshot.set(&record.name, record.resolved()) {
                debug!(field = %record.name, "ignoring response field outside the schema");
            }
        }
        snapshot
    }
}

/// Rejected save payload: `{"errors": {field: [messages]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub errors: IndexMap<String, Messages>,
}

/// Messages for one field; servers send either a list or a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    Many(Vec<String>),
    One(String),
}

impl Messages {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Messages::Many(messages) => messages,
            Messages::One(message) => vec![message],
        }
    }
}

impl ErrorPayload {
    pub fn field(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        match self.errors.shift_remove(&name) {
            Some(existing) => {
                let mut messages = existing.into_vec();
                messages.push(message);
                self.errors.insert(name, Messages::Many(messages));
            }
            None => {
                self.errors.insert(name, Messages::Many(vec![message]));
            }
        }
        self
    }

    pub fn into_error_map(self) -> ErrorMap {
        self.errors
            .into_iter()
            .map(|(name, messages)| (name, messages.into_vec()))
            .collect()
    }

    /// Splits the errors into those naming a schema field and the rest.
    pub fn partition(self, schema: &FormSchema) -> (ErrorMap, ErrorMap) {
        let mut fields = ErrorMap::new();
        let mut other = ErrorMap::new();
        for (name, messages) in self.errors {
            if schema.contains(&name) {
                fields.insert(name, messages.into_vec());
            } else {
                debug!(field = %name, "error names a field outside the schema");
                other.insert(name, messages.into_vec());
            }
        }
        (fields, other)
    }
}
