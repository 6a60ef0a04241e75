use std::env;
use std::path::PathBuf;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub ollama_url: String,
    pub prompts_dir: PathBuf,
    pub debug_log_path: PathBuf,
    /// Vector store location. No retriever is registered when unset.
    pub chroma_url: Option<String>,
    pub chroma_tenant: String,
    pub chroma_database: String,
    pub chroma_collection: String,
    pub embed_model: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            prompts_dir: env::var("PROMPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("prompts")),
            debug_log_path: env::var("DEBUG_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("debug.log")),
            chroma_url: env::var("CHROMA_URL").ok().filter(|v| !v.trim().is_empty()),
            chroma_tenant: env::var("CHROMA_TENANT")
                .unwrap_or_else(|_| "default_tenant".to_string()),
            chroma_database: env::var("CHROMA_DATABASE")
                .unwrap_or_else(|_| "default_database".to_string()),
            chroma_collection: env::var("CHROMA_COLLECTION")
                .unwrap_or_else(|_| "artificial_intelligence".to_string()),
            embed_model: env::var("EMBED_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
        }
    }
}
