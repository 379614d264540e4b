use actix_web::{http::Method, web};
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").service(
            web::resource("/chat")
                .route(web::post().to(handlers::chat))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        ),
    )
    .route("/invoke", web::post().to(handlers::invoke))
    .route("/health", web::get().to(handlers::health_check));
}
