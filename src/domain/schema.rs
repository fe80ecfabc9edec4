use indexmap::IndexMap;
use serde_json::Value;

use super::range::RangeSpec;

/// The complete, immutable description of a settings form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub sections: Vec<FormSection>,
    pub key_map: KeyMap,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order. This is the key set of every snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Source location of a field inside the external settings object.
    pub fn source_path(&self, name: &str) -> Option<&SourcePath> {
        self.key_map.get(name)
    }

    pub fn choice_fields(&self) -> impl Iterator<Item = (&FieldDefinition, &ChoiceSource)> {
        self.fields.iter().filter_map(|field| match &field.kind {
            FieldKind::Choice(source) => Some((field, source)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    LongText,
    Boolean,
    Choice(ChoiceSource),
    Range(RangeSpec),
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::LongText => "textarea",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice(_) => "choice",
            FieldKind::Range(_) => "range",
        }
    }
}

/// Where a choice field gets its options from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceSource {
    Static(Vec<ChoiceOption>),
    /// Teams the current user belongs to, as `(id, slug)` pairs.
    TeamMemberships,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub help: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            help: None,
            placeholder: None,
            required: true,
            kind,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            humanize(&self.name)
        } else {
            self.label.clone()
        }
    }

    pub fn range(&self) -> Option<&RangeSpec> {
        match &self.kind {
            FieldKind::Range(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Path of property names leading to a value inside a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath(Vec<String>);

impl SourcePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in &self.0 {
            match current {
                Value::Object(map) => {
                    current = map.get(segment)?;
                }
                _ => return None,
            }
        }
        Some(current)
    }
}

impl std::fmt::Display for SourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Internal field name to external property path.
pub type KeyMap = IndexMap<String, SourcePath>;

/// `resolve_age` becomes `Resolve age`.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
