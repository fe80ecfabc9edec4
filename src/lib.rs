#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod presentation;
pub mod submit;

pub use app::{
    Completion, FormOptions, PendingSubmission, Route, SettingsForm, StatusLine, SubmitOutcome,
};
pub use domain::{
    AUTO_RESOLVE_MAX_HOURS, ChoiceOption, FieldDefinition, FieldKind, FormSchema, FormSection,
    Membership, RangeSpec, project_settings_schema,
};
pub use form::{
    ErrorMap, FieldChange, FormCommand, FormError, FormEvent, FormSnapshot, FormState,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, SaveReport, emit, parse_document_any,
    parse_document_str, parse_field_assignment,
};
pub use presentation::{Control, FieldRenderer, FieldView, PlainTextRenderer, SectionView};
#[cfg(feature = "http")]
pub use submit::HttpEndpoint;
pub use submit::{
    EndpointConfig, ErrorPayload, FieldRecord, ProjectTarget, SaveFailure, SaveResponse,
    SaveResult, SettingsEndpoint, SubmitPhase,
};

pub mod prelude {
    pub use super::{
        FormOptions, FormSnapshot, Membership, ProjectTarget, SettingsEndpoint, SettingsForm,
        SubmitOutcome, project_settings_schema,
    };
}
