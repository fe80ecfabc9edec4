use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::FormSchema;

/// Field name to scalar value, in schema order.
///
/// The key set is fixed when the snapshot is built from a schema; `set`
/// refuses names outside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot(IndexMap<String, Value>);

impl FormSnapshot {
    /// Reads every schema field out of `source` through the schema's key map.
    /// Fields without a mapping, or whose property is absent, hold `null`.
    pub fn from_source(schema: &FormSchema, source: &Value) -> Self {
        let values = schema
            .keys()
            .map(|name| {
                let value = schema
                    .source_path(name)
                    .and_then(|path| path.resolve(source))
                    .cloned()
                    .unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        Self(values)
    }

    /// A snapshot holding `null` for every schema field.
    pub fn empty(schema: &FormSchema) -> Self {
        Self(
            schema
                .keys()
                .map(|name| (name.to_string(), Value::Null))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Overwrites an existing key. Returns `false` when `name` is not a key.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn same_keys(&self, other: &FormSnapshot) -> bool {
        self.len() == other.len() && self.keys().all(|name| other.contains(name))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

/// Field name to validation messages. Never holds an empty message list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, Vec<String>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, messages: Vec<String>) {
        let name = name.into();
        if messages.is_empty() {
            self.0.shift_remove(&name);
        } else {
            self.0.insert(name, messages);
        }
    }

    pub fn push(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(message.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(String, Vec<String>)> for ErrorMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut map = ErrorMap::new();
        for (name, messages) in iter {
            map.insert(name, messages);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project_settings_schema;
    use serde_json::json;

    #[test]
    fn source_values_follow_key_map() {
        let schema = project_settings_schema();
        let source = json!({
            "name": "Backend",
            "slug": "backend",
            "securityToken": "abc123",
            "options": {"sentry:resolve_age": 48, "mail:subject_prefix": "[be]"}
        });
        let snapshot = FormSnapshot::from_source(&schema, &source);
        assert_eq!(snapshot.len(), schema.fields.len());
        assert_eq!(snapshot.get("resolve_age"), Some(&json!(48)));
        assert_eq!(snapshot.get("mail_subject_prefix"), Some(&json!("[be]")));
        assert_eq!(snapshot.get("token"), Some(&json!("abc123")));
        assert_eq!(snapshot.get("team"), Some(&Value::Null));
        assert_eq!(snapshot.get("origins"), Some(&Value::Null));
    }

    #[test]
    fn set_never_adds_keys() {
        let schema = project_settings_schema();
        let mut snapshot = FormSnapshot::empty(&schema);
        assert!(snapshot.set("slug", json!("api")));
        assert!(!snapshot.set("platform", json!("rust")));
        assert!(!snapshot.contains("platform"));
        assert_eq!(snapshot.len(), schema.fields.len());
    }

    #[test]
    fn error_map_stays_sparse() {
        let mut errors = ErrorMap::new();
        errors.insert("slug", Vec::new());
        assert!(errors.is_empty());
        errors.push("slug", "This field is required.");
        errors.push("slug", "Too short.");
        assert_eq!(errors.message_count(), 2);
        errors.insert("slug", Vec::new());
        assert!(!errors.contains("slug"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let schema = project_settings_schema();
        let snapshot = FormSnapshot::empty(&schema);
        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded, snapshot.to_value());
        assert_eq!(encoded["name"], Value::Null);
    }
}
