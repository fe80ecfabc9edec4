use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};

use crate::form::{FieldChange, FormSnapshot};

use super::DocumentFormat;

/// Where a saved snapshot is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` is stdout, anything else a file path.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "-" => OutputDestination::Stdout,
            path => OutputDestination::file(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    /// Also write the fields the save changed.
    pub include_changes: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            include_changes: false,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_changes(mut self, include: bool) -> Self {
        self.include_changes = include;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// The result of a save as it is written out: the confirmed values and what
/// the save changed relative to the values before it.
#[derive(Debug, Clone, Copy)]
pub struct SaveReport<'a> {
    pub snapshot: &'a FormSnapshot,
    pub changes: &'a [FieldChange],
}

impl SaveReport<'_> {
    /// The bare snapshot, or `{config, changes}` when changes are requested.
    pub fn to_document(&self, include_changes: bool) -> Value {
        if !include_changes {
            return self.snapshot.to_value();
        }
        let changes: Map<String, Value> = self
            .changes
            .iter()
            .map(|change| {
                (
                    change.name.clone(),
                    json!({"from": change.initial, "to": change.current}),
                )
            })
            .collect();
        json!({"config": self.snapshot.to_value(), "changes": changes})
    }
}

/// Serializes `report` once and writes it to every configured destination.
pub fn emit(report: &SaveReport<'_>, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let document = report.to_document(options.include_changes);
    let payload = options.format.serialize(&document, options.pretty)?;
    for destination in &options.destinations {
        write_to(destination, &payload)?;
    }
    Ok(())
}

fn write_to(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{payload}").context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
        OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
            .with_context(|| format!("failed to write snapshot to {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project_settings_schema;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn snapshot() -> FormSnapshot {
        let schema = project_settings_schema();
        FormSnapshot::from_source(
            &schema,
            &json!({"name": "Backend", "slug": "backend", "options": {"sentry:resolve_age": 24}}),
        )
    }

    #[test]
    fn bare_snapshot_by_default() {
        let snapshot = snapshot();
        let report = SaveReport {
            snapshot: &snapshot,
            changes: &[],
        };
        let document = report.to_document(false);
        assert_eq!(document["slug"], "backend");
        assert_eq!(document["resolve_age"], 24);
        assert!(document.get("changes").is_none());
    }

    #[test]
    fn changes_are_keyed_by_field() {
        let snapshot = snapshot();
        let changes = vec![FieldChange {
            name: "resolve_age".into(),
            initial: json!(0),
            current: json!(24),
        }];
        let report = SaveReport {
            snapshot: &snapshot,
            changes: &changes,
        };
        let document = report.to_document(true);
        assert_eq!(document["changes"]["resolve_age"], json!({"from": 0, "to": 24}));
        assert_eq!(document["config"]["name"], "Backend");
    }

    #[test]
    fn no_destinations_writes_nothing() {
        let snapshot = snapshot();
        let report = SaveReport {
            snapshot: &snapshot,
            changes: &[],
        };
        emit(&report, &OutputOptions::default().with_destinations(Vec::new())).unwrap();
    }

    #[test]
    fn writes_snapshot_file() {
        let path = std::env::temp_dir().join(format!(
            "settingsform-snapshot-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let snapshot = snapshot();
        let report = SaveReport {
            snapshot: &snapshot,
            changes: &[],
        };
        let options = OutputOptions::default()
            .with_pretty(false)
            .with_destinations(vec![OutputDestination::file(&path)]);
        emit(&report, &options).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(r#""slug":"backend""#));
        assert!(contents.ends_with('\n'));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn dash_means_stdout() {
        assert_eq!(OutputDestination::parse("-"), OutputDestination::Stdout);
        assert_eq!(
            OutputDestination::parse("saved.json"),
            OutputDestination::File(PathBuf::from("saved.json"))
        );
    }
}
