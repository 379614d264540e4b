pub mod prompt;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::{RelayError, RelayResult};

/// Upper bound for one backend round-trip.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(100);

const MAX_NEW_TOKENS: u32 = 512;
const DO_SAMPLE: bool = true;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;

/// Payload for the backend's `/generate` route. Sampling settings are fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: MAX_NEW_TOKENS,
            do_sample: DO_SAMPLE,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub generated_text: String,
}

impl GenerationResponse {
    /// Checks status, emptiness, JSON shape and the `generated_text` field,
    /// in that order.
    pub fn from_reply(status: StatusCode, body: &[u8]) -> RelayResult<Self> {
        if status != StatusCode::OK {
            return Err(RelayError::BackendStatus(status));
        }
        if body.is_empty() {
            return Err(RelayError::BackendEmptyBody);
        }

        let parsed: Value =
            serde_json::from_slice(body).map_err(RelayError::BackendMalformedJson)?;
        debug!("Generation backend response: {}", parsed);

        let generated_text = parsed
            .get("generated_text")
            .and_then(Value::as_str)
            .ok_or(RelayError::BackendMissingField)?;

        Ok(Self {
            generated_text: generated_text.to_string(),
        })
    }
}

/// Client for the remote text-generation server.
pub struct GenerationClient {
    endpoint: String,
    client: Client,
}

impl GenerationClient {
    pub fn new(endpoint: impl Into<String>) -> RelayResult<Self> {
        Self::with_timeout(endpoint, GENERATION_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> RelayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate(&self, prompt: &str) -> RelayResult<GenerationResponse> {
        let payload = GenerationRequest::new(prompt);
        debug!(
            "Calling generation backend with payload: {}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        // `json` sets `Content-Type: application/json`
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        info!(
            "Generation backend answered {} with {} bytes",
            status.as_u16(),
            body.len()
        );

        GenerationResponse::from_reply(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::MockBackend;
    use serde_json::json;

    #[test]
    fn request_uses_fixed_sampling() {
        let payload = serde_json::to_value(GenerationRequest::new("User: Hi\nAssistant: ")).unwrap();
        assert_eq!(
            payload,
            json!({
                "prompt": "User: Hi\nAssistant: ",
                "max_new_tokens": 512,
                "do_sample": true,
                "temperature": 0.7,
                "top_p": 0.9
            })
        );
    }

    #[test]
    fn accepts_generated_text() {
        let reply =
            GenerationResponse::from_reply(StatusCode::OK, br#"{"generated_text":"Hello!"}"#)
                .unwrap();
        assert_eq!(reply.generated_text, "Hello!");
    }

    #[test]
    fn non_ok_status_wins_over_body() {
        let err = GenerationResponse::from_reply(
            StatusCode::CREATED,
            br#"{"generated_text":"Hello!"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::BackendStatus(s) if s == StatusCode::CREATED));
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = GenerationResponse::from_reply(StatusCode::OK, b"").unwrap_err();
        assert!(matches!(err, RelayError::BackendEmptyBody));
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn garbage_body_is_rejected() {
        let err = GenerationResponse::from_reply(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, RelayError::BackendMalformedJson(_)));
    }

    #[test]
    fn missing_or_non_string_field_is_rejected() {
        for body in [
            &br#"{"text":"Hello!"}"#[..],
            &br#"{"generated_text":42}"#[..],
            &br#"["generated_text"]"#[..],
        ] {
            let err = GenerationResponse::from_reply(StatusCode::OK, body).unwrap_err();
            assert!(matches!(err, RelayError::BackendMissingField));
        }
    }

    #[actix_web::test]
    async fn posts_prompt_to_backend() {
        let backend = MockBackend::start(200, r#"{"generated_text":"Hello!"}"#);
        let client = GenerationClient::new(backend.url()).unwrap();

        let reply = client.generate("User: Hi\nAssistant: ").await.unwrap();
        assert_eq!(reply.generated_text, "Hello!");

        let received = backend.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].payload["prompt"], "User: Hi\nAssistant: ");
        assert_eq!(received[0].payload["max_new_tokens"], 512);
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
    }

    #[actix_web::test]
    async fn slow_backend_hits_the_deadline() {
        let backend = MockBackend::start_with_delay(
            200,
            r#"{"generated_text":"late"}"#,
            Duration::from_secs(2),
        );
        let client =
            GenerationClient::with_timeout(backend.url(), Duration::from_millis(200)).unwrap();

        let err = client.generate("Assistant: ").await.unwrap_err();
        match err {
            RelayError::Transport(inner) => assert!(inner.is_timeout()),
            other => panic!("expected transport timeout, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = GenerationClient::new("http://127.0.0.1:1/generate").unwrap();
        let err = client.generate("Assistant: ").await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
