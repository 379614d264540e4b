use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use log::{debug, error};
use serde_json::json;

use crate::error::RelayError;
use crate::mediator::RequestMediator;
use crate::web::models::{GatewayEvent, OutboundResult, ProxyResponse, CORS_HEADERS};

fn to_http(proxy: ProxyResponse) -> HttpResponse {
    let status = StatusCode::from_u16(proxy.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    for (name, value) in &proxy.headers {
        builder.insert_header((name.as_str(), value.as_str()));
    }
    builder.body(proxy.body)
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// CORS preflight for the chat endpoint; no body, so no Content-Type
pub async fn preflight() -> impl Responder {
    let mut builder = HttpResponse::Ok();
    for (name, value) in CORS_HEADERS.iter().filter(|(name, _)| *name != "Content-Type") {
        builder.insert_header((*name, *value));
    }
    builder.finish()
}

// Chat API endpoint: the request body is the chat payload itself
pub async fn chat(mediator: web::Data<RequestMediator>, body: web::Bytes) -> impl Responder {
    let result = match std::str::from_utf8(&body) {
        Ok(text) => mediator.handle(Some(text), None).await,
        Err(e) => {
            let err = RelayError::InvalidUtf8(e);
            error!("Rejected chat request: {}", err);
            OutboundResult::failure(&err)
        }
    };
    to_http(ProxyResponse::from(&result))
}

// Gateway-style invocation: the request body is the whole trigger event and
// the reply is the proxy envelope
pub async fn invoke(mediator: web::Data<RequestMediator>, event: web::Bytes) -> impl Responder {
    debug!("Received event: {}", String::from_utf8_lossy(&event));
    let result = match serde_json::from_slice::<GatewayEvent>(&event) {
        Ok(event) => {
            let caller = event.caller_identity();
            mediator
                .handle(event.body.as_deref(), caller.as_deref())
                .await
        }
        Err(e) => {
            error!("Unreadable gateway event: {}", e);
            OutboundResult::failure(&RelayError::InputParse(e))
        }
    };
    HttpResponse::Ok().json(ProxyResponse::from(&result))
}
