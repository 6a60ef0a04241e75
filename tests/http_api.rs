//! HTTP surface tests against the real route table, with in-process providers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, test, web::Data, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use tutor_chat::assistant::{Assistant, PromptStore};
use tutor_chat::error::Result;
use tutor_chat::model::ChatProvider;
use tutor_chat::retrieval::ContextRetriever;
use tutor_chat::web::models::{
    ChatResponse, ErrorResponse, Message, ModelsResponse, TokenResponse,
};
use tutor_chat::web::routes;
use tutor_chat::AppState;

#[derive(Default)]
struct EchoProvider {
    chats: Mutex<Vec<(String, Vec<Message>)>>,
}

#[async_trait]
impl ChatProvider for EchoProvider {
    async fn ensure_available(&self, _model: &str) -> Result<()> {
        Ok(())
    }

    async fn chat(&self, model: &str, messages: &[Message]) -> Result<Value> {
        self.chats
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(json!({ "message": { "role": "assistant", "content": format!("echo: {last}") } }))
    }
}

fn shipped_prompts() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

fn state(prompts_dir: &Path, log_dir: &TempDir, provider: Arc<EchoProvider>) -> Data<AppState> {
    Data::new(AppState {
        assistant: Assistant::new(
            PromptStore::new(prompts_dir),
            ContextRetriever::unavailable(),
            provider,
            log_dir.path().join("debug.log"),
        ),
    })
}

#[actix_web::test]
async fn health_reports_healthy() {
    let logs = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "status": "healthy" }));
}

#[actix_web::test]
async fn token_is_random_and_expires_in_an_hour() {
    let logs = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/token").to_request();
    let first: TokenResponse = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::get().uri("/api/token").to_request();
    let second: TokenResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(first.expires_in, 3600);
    assert_eq!(first.token.len(), 43);
    assert_ne!(first.token, second.token);
}

#[actix_web::test]
async fn models_lists_front_end_labels() {
    let logs = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/models").to_request();
    let body: ModelsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.models, vec!["Poro-2", "Ahma-3"]);
}

#[actix_web::test]
async fn startup_message_returns_greeting_asset() {
    let logs = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/startup-message?topic=search%20algorithms")
        .to_request();
    let body: ChatResponse = test::call_and_read_body_json(&app, req).await;

    let expected =
        std::fs::read_to_string(shipped_prompts().join("chat_startup_text.md")).unwrap();
    assert_eq!(body.reply, expected);
    assert_eq!(body.status, "success");
}

#[actix_web::test]
async fn startup_message_without_asset_is_server_error() {
    let empty = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(empty.path(), &empty, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/startup-message").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Error loading startup message"));
}

#[actix_web::test]
async fn chat_turn_replies_with_model_text() {
    let logs = TempDir::new().unwrap();
    let provider = Arc::new(EchoProvider::default());
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, provider.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({
            "messages": [{ "role": "user", "content": "What is a perceptron?" }],
            "token": "abc",
            "model": "Poro-2",
            "topic": "neural networks",
            "tutor_tools": ["pedagogy_prompt", "RAG", "evaluator"]
        }))
        .to_request();
    let body: ChatResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.reply, "echo: What is a perceptron?");
    assert_eq!(body.status, "success");

    let chats = provider.chats.lock().unwrap();
    let (model, messages) = &chats[0];
    assert_eq!(model, "hf.co/tensorblock/LumiOpen_Llama-Poro-2-8B-Instruct-GGUF");
    assert!(messages[0].content.contains("neural networks"));
    assert!(!messages[0].content.contains("CONTEXT"));
}

#[actix_web::test]
async fn empty_conversation_answers_with_error_text() {
    let logs = TempDir::new().unwrap();
    let provider = Arc::new(EchoProvider::default());
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, provider.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "messages": [] }))
        .to_request();
    let body: ChatResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.reply, tutor_chat::assistant::INVALID_PAYLOAD);
    assert!(provider.chats.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn missing_prompt_assets_make_chat_fail() {
    let empty = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(empty.path(), &empty, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "messages": [{ "role": "user", "content": "hi" }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Error generating response"));
}

#[actix_web::test]
async fn null_optional_fields_are_accepted() {
    let logs = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state(&shipped_prompts(), &logs, Arc::default()))
            .configure(routes::configure),
    )
    .await;

    for body in [
        json!({ "messages": [{ "role": "user", "content": "hi" }], "tutor_tools": null }),
        json!({ "messages": [{ "role": "user", "content": "hi" }], "use_rag": null }),
        json!({
            "messages": [{ "role": "user", "content": "hi" }],
            "token": null,
            "model": null,
            "topic": null,
            "tutor_tools": null,
            "use_rag": null
        }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let reply: ChatResponse = test::read_body_json(resp).await;
        assert_eq!(reply.reply, "echo: hi");
    }
}
