use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::form::{FormError, FormSnapshot};

use super::{
    endpoint::{EndpointConfig, ProjectTarget, SaveFailure, SaveResult, SettingsEndpoint},
    payload::{ErrorPayload, SaveResponse},
};

/// Saves settings with a single `PUT` of the whole snapshot.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    config: EndpointConfig,
}

impl HttpEndpoint {
    pub fn new(config: EndpointConfig) -> Result<Self, FormError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FormError::transport(None, err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

#[async_trait]
impl SettingsEndpoint for HttpEndpoint {
    async fn save(&self, target: &ProjectTarget, body: &FormSnapshot) -> SaveResult {
        let url = self.config.url_for(target);
        debug!(%url, fields = body.len(), "sending settings");

        let mut request = self.client.put(&url).json(body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| {
                SaveFailure::transport(err.status().map(|code| code.as_u16()), err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<SaveResponse>().await.map_err(|err| {
                SaveFailure::Transport(FormError::Decode(err.to_string()))
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| SaveFailure::transport(Some(status.as_u16()), err.to_string()))?;
        classify_failure(status, &text)
    }
}

/// A 4xx body carrying an `errors` object is a validation rejection; any
/// other failure is a transport problem.
fn classify_failure(status: StatusCode, body: &str) -> SaveResult {
    if status.is_client_error()
        && let Ok(payload) = serde_json::from_str::<ErrorPayload>(body)
        && !payload.errors.is_empty()
    {
        return Err(SaveFailure::Rejected(payload));
    }
    warn!(status = status.as_u16(), "settings save failed");
    let reason = status.canonical_reason().unwrap_or("unexpected response");
    Err(SaveFailure::transport(Some(status.as_u16()), reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_is_a_rejection() {
        let body = r#"{"errors": {"slug": ["This field is required."]}}"#;
        let result = classify_failure(StatusCode::BAD_REQUEST, body);
        let Err(SaveFailure::Rejected(payload)) = result else {
            panic!("expected a validation rejection");
        };
        assert!(payload.errors.contains_key("slug"));
    }

    #[test]
    fn server_errors_are_transport_failures() {
        let body = r#"{"errors": {"slug": ["ignored"]}}"#;
        let result = classify_failure(StatusCode::BAD_GATEWAY, body);
        assert_eq!(
            result,
            Err(SaveFailure::transport(Some(502), "Bad Gateway"))
        );
    }

    #[test]
    fn client_error_without_field_errors_is_transport() {
        let result = classify_failure(StatusCode::FORBIDDEN, r#"{"detail": "nope"}"#);
        assert!(matches!(
            result,
            Err(SaveFailure::Transport(FormError::Transport {
                status: Some(403),
                ..
            }))
        ));
    }
}
