use std::{fmt, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

/// Supported data formats for reading project objects and writing snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    pub fn available_formats() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    /// Reads a document in this format as a JSON value.
    pub fn parse(self, contents: &str) -> Result<Value> {
        match self {
            DocumentFormat::Json => serde_json::from_str(contents).context("invalid JSON document"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => serde_yaml::from_str(contents).context("invalid YAML document"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => {
                let table: toml::Table = contents.parse().context("invalid TOML document")?;
                serde_json::to_value(table).context("TOML document has no JSON form")
            }
        }
    }

    /// Writes `value` in this format. TOML has no null, so null entries are
    /// left out of TOML output.
    pub fn serialize(self, value: &Value, pretty: bool) -> Result<String> {
        match self {
            DocumentFormat::Json if pretty => {
                serde_json::to_string_pretty(value).context("failed to write JSON")
            }
            DocumentFormat::Json => serde_json::to_string(value).context("failed to write JSON"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to write YAML"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => {
                let value = without_nulls(value);
                if pretty {
                    toml::to_string_pretty(&value).context("failed to write TOML")
                } else {
                    toml::to_string(&value).context("failed to write TOML")
                }
            }
        }
    }
}

#[cfg(feature = "toml")]
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, item)| !item.is_null())
                .map(|(key, item)| (key.clone(), without_nulls(item)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(without_nulls)
                .collect(),
        ),
        other => other.clone(),
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}
