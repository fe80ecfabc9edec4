use serde_json::Value;

use crate::domain::{ChoiceOption, FieldDefinition, FieldKind, FormSection, range::coerce_integer};

/// Everything a renderer needs to draw one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    pub definition: &'a FieldDefinition,
    pub value: &'a Value,
    pub errors: &'a [String],
    pub dirty: bool,
    pub control: Control<'a>,
}

impl FieldView<'_> {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The control a field maps to, derived from its kind and current value.
#[derive(Debug, Clone, PartialEq)]
pub enum Control<'a> {
    Text {
        text: String,
    },
    TextArea {
        lines: Vec<String>,
    },
    Toggle {
        on: bool,
    },
    Select {
        options: &'a [ChoiceOption],
        selected: Option<usize>,
    },
    Slider {
        stops: Vec<i64>,
        position: Option<usize>,
        label: Option<String>,
    },
}

impl<'a> Control<'a> {
    pub fn for_field(
        definition: &FieldDefinition,
        value: &Value,
        options: &'a [ChoiceOption],
    ) -> Self {
        match &definition.kind {
            FieldKind::Text => Control::Text {
                text: value_to_string(value),
            },
            FieldKind::LongText => Control::TextArea {
                lines: value_to_string(value).lines().map(str::to_string).collect(),
            },
            FieldKind::Boolean => Control::Toggle {
                on: value.as_bool().unwrap_or(false),
            },
            FieldKind::Choice(_) => {
                let current = value_to_string(value);
                Control::Select {
                    options,
                    selected: options.iter().position(|option| option.value == current),
                }
            }
            FieldKind::Range(spec) => Control::Slider {
                stops: spec.allowed_values(),
                position: coerce_integer(value).and_then(|hours| spec.nearest_position(hours)),
                label: spec.label_for(value),
            },
        }
    }

    /// Short textual form of the control's value.
    pub fn summary(&self) -> String {
        match self {
            Control::Text { text } => text.clone(),
            Control::TextArea { lines } => lines.join(", "),
            Control::Toggle { on } => (if *on { "on" } else { "off" }).to_string(),
            Control::Select { options, selected } => selected
                .and_then(|idx| options.get(idx))
                .map(|option| option.label.clone())
                .unwrap_or_else(|| "<none>".to_string()),
            Control::Slider { label, .. } => label.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<'a> {
    pub section: &'a FormSection,
    pub fields: Vec<FieldView<'a>>,
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
