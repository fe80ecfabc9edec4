mod coordinator;
mod endpoint;
#[cfg(feature = "http")]
mod http;
mod payload;

pub use coordinator::{SubmissionCoordinator, SubmissionTicket, SubmitPhase};
pub use endpoint::{EndpointConfig, ProjectTarget, SaveFailure, SaveResult, SettingsEndpoint};
#[cfg(feature = "http")]
pub use http::HttpEndpoint;
pub use payload::{ErrorPayload, FieldRecord, Messages, SaveResponse};
