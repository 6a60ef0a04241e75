use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{AssistantError, Result};
use crate::model::ChatProvider;
use crate::web::models::Message;

// A wrapper for the Ollama server API
pub struct OllamaClient {
    server_url: String,
    client: Client,
}

impl OllamaClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        info!("Using Ollama server at: {}", server_url);

        Self {
            server_url,
            client: Client::new(),
        }
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.server_url, path);
        debug!("POST {} payload: {}", url, payload);

        let response = self.client.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Provider(format!(
                "{} returned {}: {}",
                path, status, error_text
            )));
        }

        Ok(response)
    }

    /// Embeds `input` with `model`, returning one vector.
    pub async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>> {
        let payload = json!({ "model": model, "input": input });
        let response_json: Value = self.post("/api/embed", &payload).await?.json().await?;

        let vector = response_json
            .get("embeddings")
            .and_then(|embeddings| embeddings.get(0))
            .cloned()
            .ok_or_else(|| AssistantError::Decode("no embeddings in reply".to_string()))?;

        serde_json::from_value(vector).map_err(|e| AssistantError::Decode(e.to_string()))
    }
}

pub(crate) fn chat_payload(model: &str, messages: &[Message]) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "stream": false
    })
}

#[async_trait]
impl ChatProvider for OllamaClient {
    async fn ensure_available(&self, model: &str) -> Result<()> {
        info!("Pulling model: {}", model);
        let payload = json!({ "model": model, "stream": false });
        self.post("/api/pull", &payload).await?;
        Ok(())
    }

    async fn chat(&self, model: &str, messages: &[Message]) -> Result<Value> {
        info!(
            "Sending {} messages to Ollama model {}",
            messages.len(),
            model
        );
        let payload = chat_payload(model, messages);
        let response_json: Value = self.post("/api/chat", &payload).await?.json().await?;
        debug!("Response JSON: {}", response_json);
        Ok(response_json)
    }
}
