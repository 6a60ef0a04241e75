use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use uuid::Uuid;

use crate::model::model_labels;
use crate::web::models::{
    ChatRequest, ChatResponse, ErrorResponse, ModelsResponse, StartupQuery, TokenResponse,
};
use crate::AppState;

const TOKEN_LEN: usize = 43;
const TOKEN_TTL_SECS: u64 = 3600;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

// Mock session token, nothing checks it
pub async fn issue_token() -> impl Responder {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();

    HttpResponse::Ok().json(TokenResponse {
        token,
        expires_in: TOKEN_TTL_SECS,
    })
}

// Chat API endpoint
pub async fn chat(data: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Chat request: {} messages, model {:?}, topic {:?}",
        request_id,
        req.messages.len(),
        req.model,
        req.topic
    );

    match data.assistant.generate_response(&req).await {
        Ok(reply) => {
            info!("[{}] Reply ready ({} characters)", request_id, reply.len());
            HttpResponse::Ok().json(ChatResponse::success(reply))
        }
        Err(e) => {
            error!("[{}] Failed to generate response: {}", request_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                detail: format!("Error generating response: {}", e),
            })
        }
    }
}

// Greeting shown before the first message; the topic does not change it
pub async fn startup_message(
    data: web::Data<AppState>,
    query: web::Query<StartupQuery>,
) -> impl Responder {
    info!("Startup message requested for topic {:?}", query.topic);

    match data.assistant.prompts().startup_text().await {
        Ok(text) => HttpResponse::Ok().json(ChatResponse::success(text)),
        Err(e) => {
            error!("Startup message error: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                detail: format!("Error loading startup message: {}", e),
            })
        }
    }
}

pub async fn list_models() -> impl Responder {
    HttpResponse::Ok().json(ModelsResponse {
        models: model_labels(),
    })
}
