use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/token", web::get().to(handlers::issue_token))
            .route("/chat", web::post().to(handlers::chat))
            .route("/startup-message", web::get().to(handlers::startup_message))
            .route("/models", web::get().to(handlers::list_models))
    )
    .route("/health", web::get().to(handlers::health_check));
}
