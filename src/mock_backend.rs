//! In-process stand-in for the generation server, used by tests.

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReceivedCall {
    pub payload: Value,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: String,
    delay: Duration,
    received: Arc<Mutex<Vec<ReceivedCall>>>,
}

pub struct MockBackend {
    url: String,
    received: Arc<Mutex<Vec<ReceivedCall>>>,
}

impl MockBackend {
    /// Serves `body` with `status` on `POST /generate`. Must be called from
    /// inside an actix system (e.g. `#[actix_web::test]`).
    pub fn start(status: u16, body: &str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO)
    }

    pub fn start_with_delay(status: u16, body: &str, delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: body.to_string(),
            delay,
            received: received.clone(),
        };

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/generate", web::post().to(generate))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock backend");

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            url: format!("http://{}/generate", addr),
            received,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn received(&self) -> Vec<ReceivedCall> {
        self.received.lock().unwrap().clone()
    }
}

async fn generate(req: HttpRequest, state: web::Data<MockState>, body: web::Bytes) -> HttpResponse {
    let payload = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.received.lock().unwrap().push(ReceivedCall {
        payload,
        content_type,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    HttpResponse::build(StatusCode::from_u16(state.status).unwrap())
        .content_type("application/json")
        .body(state.body.clone())
}
