use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetField { name: String, value: Value },
    RevertField { name: String },
    Reset,
}

impl FormCommand {
    pub fn set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        FormCommand::SetField {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn revert(name: impl Into<String>) -> Self {
        FormCommand::RevertField { name: name.into() }
    }
}

/// Notifications emitted to form observers after a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged { name: String },
    FieldReverted { name: String },
    Reset,
    ChoicesChanged,
    SubmitStarted,
    Saved,
    Rejected { issues: usize },
    TransportFailed { message: String },
    /// A response arrived for a form that was re-keyed since the request.
    Discarded,
}
