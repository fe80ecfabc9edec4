use textwrap::{Options, wrap};
use unicode_width::UnicodeWidthStr;

use crate::domain::FieldDefinition;

use super::{
    renderer::FieldRenderer,
    view::{Control, FieldView, SectionView},
};

const INDENT: &str = "  ";

/// Renders fields as indented plain text blocks.
#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    width: usize,
    show_help: bool,
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self {
            width: 72,
            show_help: true,
        }
    }
}

impl PlainTextRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(20),
            ..Self::default()
        }
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    fn wrapped(&self, text: &str, prefix: &str) -> Vec<String> {
        let options = Options::new(self.width)
            .initial_indent(prefix)
            .subsequent_indent(prefix);
        wrap(text, options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }

    fn header(&self, definition: &FieldDefinition) -> String {
        let mut label = definition.display_label();
        if definition.required {
            label.push_str(" *");
        }
        label
    }
}

impl FieldRenderer for PlainTextRenderer {
    type Output = String;

    fn render_field(&mut self, field: &FieldView<'_>) -> String {
        let mut lines = vec![self.header(field.definition)];
        lines.extend(value_lines(&field.control, field.definition));

        let mut meta = format!("{INDENT}type: {}", field.definition.kind.type_name());
        if field.has_errors() {
            meta.push_str("  • invalid");
        } else if field.dirty {
            meta.push_str("  • modified");
        }
        lines.push(meta);

        if self.show_help
            && let Some(help) = &field.definition.help
        {
            lines.extend(self.wrapped(help, INDENT));
        }
        for message in field.errors {
            lines.extend(self.wrapped(&format!("✗ {message}"), INDENT));
        }
        lines.join("\n")
    }

    fn render_section(&mut self, section: &SectionView<'_>) -> Vec<String> {
        let title = &section.section.title;
        let mut header = vec![
            title.clone(),
            "─".repeat(UnicodeWidthStr::width(title.as_str())),
        ];
        if let Some(description) = &section.section.description {
            header.extend(self.wrapped(description, ""));
        }
        let mut blocks = vec![header.join("\n")];
        blocks.extend(section.fields.iter().map(|field| self.render_field(field)));
        blocks
    }
}

fn value_lines(control: &Control<'_>, definition: &FieldDefinition) -> Vec<String> {
    let placeholder = || {
        definition
            .placeholder
            .as_ref()
            .map(|text| format!("{INDENT}({text})"))
            .unwrap_or_else(|| format!("{INDENT}<empty>"))
    };
    match control {
        Control::Text { text } if text.is_empty() => vec![placeholder()],
        Control::TextArea { lines } if lines.is_empty() => vec![placeholder()],
        Control::TextArea { lines } => lines
            .iter()
            .map(|line| format!("{INDENT}│ {line}"))
            .collect(),
        Control::Toggle { on } => vec![format!("{INDENT}[{}]", if *on { "x" } else { " " })],
        Control::Select { options, selected } => {
            let label_width = options
                .iter()
                .map(|option| UnicodeWidthStr::width(option.label.as_str()))
                .max()
                .unwrap_or(0);
            options
                .iter()
                .enumerate()
                .map(|(idx, option)| {
                    let marker = if Some(idx) == *selected { "(•)" } else { "( )" };
                    let pad = label_width - UnicodeWidthStr::width(option.label.as_str());
                    format!(
                        "{INDENT}{marker} {}{} [{}]",
                        option.label,
                        " ".repeat(pad),
                        option.value
                    )
                })
                .collect()
        }
        Control::Slider {
            stops,
            position,
            label,
        } => {
            let track: String = (0..stops.len())
                .map(|idx| if Some(idx) == *position { '●' } else { '·' })
                .collect();
            let label = label.as_deref().unwrap_or("unset");
            vec![format!("{INDENT}{track} {label}")]
        }
        other => vec![format!("{INDENT}{}", other.summary())],
    }
}
