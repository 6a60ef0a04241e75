pub mod ollama;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::web::models::Message;

pub use ollama::OllamaClient;

/// Identifier used when the caller names no model at all.
pub const DEFAULT_MODEL: &str = "deepseek-r1";

/// Front-end labels and the backend model each one stands for.
pub const MODELS: &[(&str, &str)] = &[
    (
        "Poro-2",
        "hf.co/tensorblock/LumiOpen_Llama-Poro-2-8B-Instruct-GGUF",
    ),
    ("Ahma-3", "hf.co/QuantFactory/Ahma-3B-GGUF:Q8_0"),
];

/// A chat-completion backend.
///
/// Constructed once at startup and shared read-only across requests.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Makes sure `model` is present locally, downloading it if needed.
    async fn ensure_available(&self, model: &str) -> Result<()>;

    /// Runs one chat completion and returns the raw reply document.
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<Value>;
}

pub fn model_labels() -> Vec<String> {
    MODELS.iter().map(|(label, _)| label.to_string()).collect()
}

/// Maps a front-end label to a backend identifier. Unknown labels pass
/// through unchanged; an empty label falls back to [`DEFAULT_MODEL`].
pub fn resolve_model(label: &str) -> String {
    let resolved = MODELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, id)| *id)
        .unwrap_or(label);

    if resolved.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        resolved.to_string()
    }
}

/// Text of a chat reply: `message.content` when it is a string, otherwise
/// the whole reply rendered as JSON.
pub fn reply_text(reply: &Value) -> String {
    reply
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| match reply {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}
