use reqwest::StatusCode;
use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

/// Every way a single chat request can fail. All of them end up as the same
/// 500 failure result; the variants only shape the error text and logs.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request has no body")]
    MissingBody,
    #[error("invalid request: {0}")]
    InputParse(#[source] serde_json::Error),
    #[error("invalid request: body is not UTF-8 text: {0}")]
    InvalidUtf8(#[source] std::str::Utf8Error),
    #[error("generation backend returned error status: {}", .0.as_u16())]
    BackendStatus(StatusCode),
    #[error("empty response from generation backend")]
    BackendEmptyBody,
    #[error("generation backend returned malformed JSON: {0}")]
    BackendMalformedJson(#[source] serde_json::Error),
    #[error("missing generated_text in the response from generation backend")]
    BackendMissingField,
    #[error("failed to reach generation backend: {0}")]
    Transport(#[from] reqwest::Error),
}
