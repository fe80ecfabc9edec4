mod membership;
mod project;
pub mod range;
mod schema;

pub use membership::{Membership, member_choices};
pub use project::{AUTO_RESOLVE_MAX_HOURS, AUTO_RESOLVE_NOTE, project_settings_schema};
pub use range::{Quantization, RangeSpec, allowed_values, format_label};
pub use schema::{
    ChoiceOption, ChoiceSource, FieldDefinition, FieldKind, FormSchema, FormSection, KeyMap,
    SourcePath, humanize,
};
