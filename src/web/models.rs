use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::RelayError;

/// Speaker of a history entry. Anything that is not `user` or `assistant`
/// is kept verbatim as `Other` so it can be echoed back, but it never
/// reaches the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    /// Prefix used for this speaker in the flat prompt, `None` if ignored.
    pub fn speaker_label(&self) -> Option<&'static str> {
        match self {
            Role::User => Some("User"),
            Role::Assistant => Some("Assistant"),
            Role::Other(_) => None,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
            Role::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Decoded body of an inbound chat call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    pub message: String,
    #[serde(default)]
    conversation_history: Option<Vec<ChatMessage>>,
}

impl InboundRequest {
    pub fn from_body(body: Option<&str>) -> Result<Self, RelayError> {
        let body = body.ok_or(RelayError::MissingBody)?;
        serde_json::from_str(body).map_err(RelayError::InputParse)
    }

    /// Caller-supplied history; absent and `null` both mean empty.
    pub fn history(&self) -> &[ChatMessage] {
        self.conversation_history.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundResult {
    Success {
        response: String,
        conversation_history: Vec<ChatMessage>,
    },
    Failure {
        error: String,
    },
}

impl OutboundResult {
    pub fn failure(err: &RelayError) -> Self {
        OutboundResult::Failure {
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutboundResult::Success { .. })
    }

    pub fn status_code(&self) -> u16 {
        if self.is_success() {
            200
        } else {
            500
        }
    }

    pub fn to_body(&self) -> Value {
        match self {
            OutboundResult::Success {
                response,
                conversation_history,
            } => json!({
                "success": true,
                "response": response,
                "conversationHistory": conversation_history,
            }),
            OutboundResult::Failure { error } => json!({
                "success": false,
                "error": error,
            }),
        }
    }
}

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

/// HTTP-shaped reply in the gateway proxy format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<&OutboundResult> for ProxyResponse {
    fn from(result: &OutboundResult) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            status_code: result.status_code(),
            headers,
            body: result.to_body().to_string(),
        }
    }
}

/// Gateway trigger event. Only `body` and the authorizer claims are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<HashMap<String, Value>>,
}

impl GatewayEvent {
    /// Email claim, falling back to the user-pool username. Logging only.
    pub fn caller_identity(&self) -> Option<String> {
        let claims = self
            .request_context
            .as_ref()?
            .authorizer
            .as_ref()?
            .claims
            .as_ref()?;

        ["email", "cognito:username"]
            .iter()
            .filter_map(|key| claims.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}
