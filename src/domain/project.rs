//! Field table for the general project settings form.

use indexmap::IndexMap;

use super::{
    range::RangeSpec,
    schema::{ChoiceSource, FieldDefinition, FieldKind, FormSchema, FormSection, KeyMap, SourcePath},
};

pub const AUTO_RESOLVE_MAX_HOURS: i64 = 168;

pub const AUTO_RESOLVE_NOTE: &str = "Note: Enabling auto resolve will immediately resolve anything that has not been seen within this period of time. There is no undo!";

/// Builds the schema for a project's general settings.
pub fn project_settings_schema() -> FormSchema {
    FormSchema {
        title: Some("Project Settings".to_string()),
        fields: project_fields(),
        sections: project_sections(),
        key_map: project_key_map(),
    }
}

fn project_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("name", "Project name", FieldKind::Text)
            .with_placeholder("e.g. My Service Name"),
        FieldDefinition::new("slug", "Short name", FieldKind::Text)
            .with_help("A unique ID used to identify this project."),
        FieldDefinition::new(
            "team",
            "Team",
            FieldKind::Choice(ChoiceSource::TeamMemberships),
        ),
        FieldDefinition::new("mail_subject_prefix", "Subject prefix", FieldKind::Text)
            .with_help("Choose a custom prefix for emails from this project.")
            .optional(),
        FieldDefinition::new("default_environment", "Default environment", FieldKind::Text)
            .with_placeholder("e.g. production")
            .with_help("The default selected environment when viewing issues.")
            .optional(),
        FieldDefinition::new(
            "resolve_age",
            "Auto resolve",
            FieldKind::Range(RangeSpec::tiered(0, AUTO_RESOLVE_MAX_HOURS)),
        )
        .with_help(
            "Automatically resolve an issue if it hasn't been seen for this amount of time.",
        )
        .optional(),
        FieldDefinition::new("scrub_data", "Data scrubber", FieldKind::Boolean)
            .with_help("Enable server-side data scrubbing.")
            .optional(),
        FieldDefinition::new("scrub_defaults", "Use default scrubbers", FieldKind::Boolean)
            .with_help(
                "Apply default scrubbers to prevent things like passwords and credit cards from being stored.",
            )
            .optional(),
        FieldDefinition::new(
            "sensitive_fields",
            "Additional sensitive fields",
            FieldKind::LongText,
        )
        .with_help(
            "Additional field names to match against when scrubbing data. Separate multiple entries with a newline.",
        )
        .with_placeholder("e.g. email")
        .optional(),
        FieldDefinition::new("safe_fields", "Safe fields", FieldKind::LongText)
            .with_help(
                "Field names which data scrubbers should ignore. Separate multiple entries with a newline.",
            )
            .with_placeholder("e.g. email")
            .optional(),
        FieldDefinition::new(
            "scrub_ip_address",
            "Don't store IP Addresses",
            FieldKind::Boolean,
        )
        .with_help("Prevent IP addresses from being stored for new events.")
        .optional(),
        FieldDefinition::new("origins", "Allowed domains", FieldKind::LongText)
            .with_help("Separate multiple entries with a newline.")
            .with_placeholder("e.g. https://example.com")
            .optional(),
        FieldDefinition::new("token", "Security token", FieldKind::Text)
            .with_help(
                "Outbound requests matching Allowed Domains will have the header \"X-Sentry-Token: {token}\" appended.",
            )
            .optional(),
        FieldDefinition::new("blacklisted_ips", "Filtered IP addresses", FieldKind::LongText)
            .with_help("Separate multiple entries with a newline.")
            .with_placeholder("e.g. 127.0.0.1 or 192.168.0.1/24")
            .optional(),
        FieldDefinition::new(
            "scrape_javascript",
            "Enable JavaScript source fetching",
            FieldKind::Boolean,
        )
        .with_help("Allow Sentry to scrape missing JavaScript source context when possible.")
        .optional(),
    ]
}

fn project_sections() -> Vec<FormSection> {
    let section = |id: &str, title: &str, description: Option<&str>, fields: &[&str]| FormSection {
        id: id.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        fields: fields.iter().map(|name| name.to_string()).collect(),
    };
    vec![
        section("details", "Project Details", None, &["name", "slug", "team"]),
        section("email", "Email", None, &["mail_subject_prefix"]),
        section(
            "events",
            "Event Settings",
            Some(AUTO_RESOLVE_NOTE),
            &["default_environment", "resolve_age"],
        ),
        section(
            "privacy",
            "Data Privacy",
            None,
            &[
                "scrub_data",
                "scrub_defaults",
                "sensitive_fields",
                "safe_fields",
                "scrub_ip_address",
            ],
        ),
        section(
            "security",
            "Client Security",
            Some(
                "Configure origin URLs which Sentry should accept events from. This will restrict requests based on the Origin and Referer headers.",
            ),
            &["origins", "scrape_javascript", "token", "blacklisted_ips"],
        ),
    ]
}

fn project_key_map() -> KeyMap {
    let option = |key: &str| SourcePath::new(["options", key]);
    let mut map = IndexMap::new();
    map.insert("name".to_string(), SourcePath::new(["name"]));
    map.insert("slug".to_string(), SourcePath::new(["slug"]));
    map.insert("origins".to_string(), option("sentry:origins"));
    map.insert("resolve_age".to_string(), option("sentry:resolve_age"));
    map.insert("scrub_data".to_string(), option("sentry:scrub_data"));
    map.insert("scrub_defaults".to_string(), option("sentry:scrub_defaults"));
    map.insert("sensitive_fields".to_string(), option("sentry:sensitive_fields"));
    map.insert("safe_fields".to_string(), option("sentry:safe_fields"));
    map.insert(
        "default_environment".to_string(),
        option("sentry:default_environment"),
    );
    map.insert("mail_subject_prefix".to_string(), option("mail:subject_prefix"));
    map.insert("scrub_ip_address".to_string(), option("sentry:scrub_ip_address"));
    map.insert("token".to_string(), SourcePath::new(["securityToken"]));
    map.insert("scrape_javascript".to_string(), option("sentry:scrape_javascript"));
    map.insert("blacklisted_ips".to_string(), option("sentry:blacklisted_ips"));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_field_is_declared_once() {
        let schema = project_settings_schema();
        let mut seen = Vec::new();
        for section in &schema.sections {
            for name in &section.fields {
                assert!(schema.contains(name), "unknown field {name}");
                assert!(!seen.contains(name), "{name} listed twice");
                seen.push(name.clone());
            }
        }
        assert_eq!(seen.len(), schema.fields.len());
    }

    #[test]
    fn key_map_only_names_schema_fields() {
        let schema = project_settings_schema();
        for name in schema.key_map.keys() {
            assert!(schema.contains(name), "{name} missing from schema");
        }
        assert!(schema.source_path("team").is_none());
        assert_eq!(
            schema.source_path("token").map(|path| path.to_string()),
            Some("securityToken".to_string())
        );
    }

    #[test]
    fn only_identity_fields_are_required() {
        let schema = project_settings_schema();
        let required: Vec<&str> = schema
            .fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(required, vec!["name", "slug", "team"]);
    }
}
