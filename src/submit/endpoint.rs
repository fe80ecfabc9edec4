use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::form::{FormError, FormSnapshot};

use super::payload::{ErrorPayload, SaveResponse};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The entity whose settings are being edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectTarget {
    pub organization: String,
    pub project: String,
}

impl ProjectTarget {
    pub fn new(organization: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
        }
    }

    /// `/projects/{organization}/{project}/`, with each segment escaped.
    pub fn path(&self) -> String {
        format!(
            "/projects/{}/{}/",
            utf8_percent_encode(&self.organization, PATH_SEGMENT),
            utf8_percent_encode(&self.project, PATH_SEGMENT)
        )
    }
}

/// Why a save did not produce an authoritative field list.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveFailure {
    /// The server answered with per-field validation errors.
    Rejected(ErrorPayload),
    /// The request did not complete.
    Transport(FormError),
}

impl SaveFailure {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        SaveFailure::Transport(FormError::transport(status, message))
    }
}

pub type SaveResult = Result<SaveResponse, SaveFailure>;

/// Persistence for a settings form: one full-replace write per call.
#[async_trait]
pub trait SettingsEndpoint: Send + Sync {
    async fn save(&self, target: &ProjectTarget, body: &FormSnapshot) -> SaveResult;
}

/// Connection settings for the HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_for(&self, target: &ProjectTarget) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), target.path())
    }
}
