mod controller;
mod options;
mod status;

pub use controller::{Completion, PendingSubmission, Route, SettingsForm, SubmitOutcome};
pub use options::FormOptions;
pub use status::{READY_STATUS, StatusLine};
