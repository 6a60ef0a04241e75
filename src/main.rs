use std::sync::Arc;

use actix_web::{web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use tutor_chat::assistant::{Assistant, PromptStore};
use tutor_chat::config::Settings;
use tutor_chat::model::OllamaClient;
use tutor_chat::retrieval::{ChromaCollection, ChromaRetriever, ContextRetriever};
use tutor_chat::web::routes;
use tutor_chat::AppState;

async fn build_retriever(settings: &Settings, ollama: Arc<OllamaClient>) -> ContextRetriever {
    let Some(chroma_url) = settings.chroma_url.as_deref() else {
        warn!("CHROMA_URL not set, retrieval disabled");
        return ContextRetriever::unavailable();
    };

    let collection = ChromaCollection {
        server_url: chroma_url.to_string(),
        tenant: settings.chroma_tenant.clone(),
        database: settings.chroma_database.clone(),
        name: settings.chroma_collection.clone(),
    };

    match ChromaRetriever::connect(&collection, ollama, settings.embed_model.clone()).await {
        Ok(retriever) => {
            info!("Vector store initialized");
            ContextRetriever::new(Arc::new(retriever))
        }
        Err(e) => {
            warn!("Could not initialize vector store: {}", e);
            ContextRetriever::unavailable()
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    info!("Starting tutor chat service");
    info!("Prompts directory: {}", settings.prompts_dir.display());

    let ollama = Arc::new(OllamaClient::new(settings.ollama_url.clone()));
    let retriever = build_retriever(&settings, ollama.clone()).await;

    let assistant = Assistant::new(
        PromptStore::new(settings.prompts_dir.clone()),
        retriever,
        ollama,
        settings.debug_log_path.clone(),
    );
    let app_state = Data::new(AppState { assistant });

    info!("Listening on {}:{}", settings.host, settings.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))
    .with_context(|| format!("failed to bind {}:{}", settings.host, settings.port))?
    .run()
    .await
    .context("server terminated with an error")
}
