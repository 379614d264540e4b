use log::{error, info};
use uuid::Uuid;

use crate::error::RelayResult;
use crate::model::prompt::compose_prompt;
use crate::model::GenerationClient;
use crate::web::models::{ChatMessage, InboundRequest, OutboundResult};

/// Turns one inbound chat body into one backend call and back. Holds no
/// per-request state, so a single instance serves concurrent requests.
pub struct RequestMediator {
    client: GenerationClient,
}

impl RequestMediator {
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }

    /// Never fails: every error becomes `OutboundResult::Failure`.
    /// `caller` is only logged.
    pub async fn handle(&self, body: Option<&str>, caller: Option<&str>) -> OutboundResult {
        let request_id = Uuid::new_v4();
        match caller {
            Some(who) => info!("[{}] Received chat request from {}", request_id, who),
            None => info!("[{}] Received chat request", request_id),
        }

        match self.mediate(request_id, body).await {
            Ok(result) => result,
            Err(e) => {
                error!("[{}] Chat request failed: {}", request_id, e);
                OutboundResult::failure(&e)
            }
        }
    }

    async fn mediate(&self, request_id: Uuid, body: Option<&str>) -> RelayResult<OutboundResult> {
        let request = InboundRequest::from_body(body)?;
        info!("[{}] Processing message: {}", request_id, request.message);

        let mut history = request.history().to_vec();
        history.push(ChatMessage::user(request.message.as_str()));

        let prompt = compose_prompt(&history);
        let reply = self.client.generate(&prompt).await?;
        info!(
            "[{}] Reply length: {} characters",
            request_id,
            reply.generated_text.chars().count()
        );

        history.push(ChatMessage::assistant(reply.generated_text.as_str()));
        Ok(OutboundResult::Success {
            response: reply.generated_text,
            conversation_history: history,
        })
    }
}
