use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;
use serde_json::Value;

use super::DocumentFormat;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=(.*)$").expect("assignment pattern is valid")
});

/// Reads a project or membership document written in `format`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    format.parse(contents)
}

/// Reads a document whose format is only a guess: `preferred` first, then
/// every other enabled format. Returns the format that succeeded.
pub fn parse_document_any(
    contents: &str,
    preferred: DocumentFormat,
) -> Result<(Value, DocumentFormat)> {
    let primary = match preferred.parse(contents) {
        Ok(value) => return Ok((value, preferred)),
        Err(err) => err,
    };
    for format in DocumentFormat::available_formats() {
        if *format == preferred {
            continue;
        }
        if let Ok(value) = format.parse(contents) {
            return Ok((value, *format));
        }
    }
    let tried: Vec<String> = DocumentFormat::available_formats()
        .iter()
        .map(ToString::to_string)
        .collect();
    Err(primary.context(format!("no format matched (tried {})", tried.join(", "))))
}

/// Parse a `name=value` edit.
///
/// The value is read as a JSON literal when it parses as one (`true`, `48`,
/// `"x"`, `null`); anything else is taken as a plain string.
pub fn parse_field_assignment(raw: &str) -> Result<(String, Value)> {
    let captures = ASSIGNMENT
        .captures(raw)
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{raw}'"))?;
    let name = captures[1].to_string();
    let literal = &captures[2];
    let value = serde_json::from_str::<Value>(literal.trim())
        .unwrap_or_else(|_| Value::String(literal.to_string()));
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_document() {
        let value = parse_document_str(r#"{"name": "A"}"#, DocumentFormat::Json).unwrap();
        assert_eq!(value, json!({"name": "A"}));
    }

    #[test]
    fn reports_invalid_json() {
        let err = parse_document_str("{", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn any_format_starts_with_preferred() {
        let (value, format) = parse_document_any("[1, 2]", DocumentFormat::Json).unwrap();
        assert_eq!(format, DocumentFormat::Json);
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn any_format_lists_tried_formats_on_failure() {
        let err = parse_document_any("{ not: [valid", DocumentFormat::Json).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("no format matched (tried json"));
        assert!(message.contains("invalid JSON document"));
    }

    #[test]
    fn assignment_reads_json_literals() {
        assert_eq!(
            parse_field_assignment("resolve_age=48").unwrap(),
            ("resolve_age".to_string(), json!(48))
        );
        assert_eq!(
            parse_field_assignment("scrub_data=false").unwrap(),
            ("scrub_data".to_string(), json!(false))
        );
        assert_eq!(
            parse_field_assignment("team=null").unwrap(),
            ("team".to_string(), Value::Null)
        );
    }

    #[test]
    fn assignment_falls_back_to_string() {
        assert_eq!(
            parse_field_assignment("mail_subject_prefix=[prod] ").unwrap(),
            ("mail_subject_prefix".to_string(), json!("[prod] "))
        );
        assert_eq!(
            parse_field_assignment("slug=").unwrap(),
            ("slug".to_string(), json!(""))
        );
    }

    #[test]
    fn assignment_requires_name() {
        assert!(parse_field_assignment("=value").is_err());
        assert!(parse_field_assignment("no-equals").is_err());
    }
}
