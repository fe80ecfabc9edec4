use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A mutation named a field that is not part of the schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no submission is pending")]
    NoSubmissionPending,

    #[error("request failed{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FormError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        FormError::Transport {
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {code}"))
        .unwrap_or_default()
}
