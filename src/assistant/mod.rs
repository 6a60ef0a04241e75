pub mod prompts;
pub mod router;

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::AsyncWriteExt;

use crate::error::{AssistantError, Result};
use crate::model::{reply_text, resolve_model, ChatProvider};
use crate::retrieval::ContextRetriever;
use crate::web::models::{ChatRequest, Message, Role, TutorTool};

pub use prompts::PromptStore;
pub use router::{parse_plan, RagChoice, RouterDecision};

pub const INVALID_PAYLOAD: &str = "Error: invalid or missing messages list in payload";
pub const UNPARSEABLE_REPLY: &str = "Error: unable to parse model response";

/// Builds the tutor's system message for a conversation and runs it
/// through the chat provider.
pub struct Assistant {
    prompts: PromptStore,
    retriever: ContextRetriever,
    provider: Arc<dyn ChatProvider>,
    debug_log: PathBuf,
}

impl Assistant {
    pub fn new(
        prompts: PromptStore,
        retriever: ContextRetriever,
        provider: Arc<dyn ChatProvider>,
        debug_log: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompts,
            retriever,
            provider,
            debug_log: debug_log.into(),
        }
    }

    pub fn prompts(&self) -> &PromptStore {
        &self.prompts
    }

    /// Produces the reply for one chat turn.
    ///
    /// Validation, provider and parsing failures come back as `Ok` with a
    /// readable error text in place of the reply. Only a missing prompt
    /// asset is returned as `Err`.
    pub async fn generate_response(&self, request: &ChatRequest) -> Result<String> {
        if request.messages.is_empty() {
            warn!("Rejecting chat request without messages");
            return Ok(INVALID_PAYLOAD.to_string());
        }

        let model = resolve_model(request.model.as_deref().unwrap_or(""));
        info!("Resolved model: {}", model);

        let system_prompt = self.compose_system_prompt(request).await?;
        self.append_debug_log(&system_prompt).await;

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(Message::new(Role::System, system_prompt));
        messages.extend(request.messages.iter().cloned());

        if let Err(e) = self.provider.ensure_available(&model).await {
            warn!("Failed to pull model {}: {}", model, e);
        }

        match self.provider.chat(&model, &messages).await {
            Ok(reply) => {
                let text = reply_text(&reply);
                info!("Response length: {} characters", text.len());
                Ok(text)
            }
            Err(AssistantError::Decode(e)) => {
                error!("Unreadable reply from model {}: {}", model, e);
                Ok(UNPARSEABLE_REPLY.to_string())
            }
            Err(e) => {
                error!("Model error: {}", e);
                Ok(format!("Error calling model: {}", e))
            }
        }
    }

    /// Joins persona, session opening, pedagogy and retrieved context,
    /// in that order, skipping whatever does not apply to this turn.
    pub async fn compose_system_prompt(&self, request: &ChatRequest) -> Result<String> {
        let mut parts = vec![self.prompts.system_prompt().await?];
        let mut used = vec!["system prompt"];

        if is_first_turn(&request.messages) {
            let topic = request.topic.as_deref().unwrap_or("");
            parts.push(self.prompts.session_beginning(topic).await?);
            used.push("session beginning prompt");
        }

        if request.wants(TutorTool::PedagogyPrompt) {
            parts.push(self.prompts.pedagogical_prompt().await?);
            used.push("pedagogical prompt");
        }

        if request.wants(TutorTool::Rag) {
            let query = latest_user_content(&request.messages);
            match self.retriever.fetch_context(query).await {
                Ok(context) => {
                    parts.push(context);
                    used.push("RAG context");
                }
                Err(e) => warn!("Error fetching RAG context: {}", e),
            }
        }

        info!("Tutor tools selected: {:?}", request.tutor_tools);
        info!("Prompts used in this request: {:?}", used);

        parts.retain(|part| !part.is_empty());
        Ok(parts.join("\n\n"))
    }

    async fn append_debug_log(&self, system_prompt: &str) {
        let entry = format!("=== {} ===\n", system_prompt);
        let written = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.debug_log)
                .await?;
            file.write_all(entry.as_bytes()).await?;
            file.flush().await
        }
        .await;

        match written {
            Ok(()) => debug!("System prompt logged to {}", self.debug_log.display()),
            Err(e) => warn!(
                "Could not append to debug log {}: {}",
                self.debug_log.display(),
                e
            ),
        }
    }
}

fn is_first_turn(messages: &[Message]) -> bool {
    messages.iter().filter(|m| m.role == Role::User).count() <= 1
}

fn latest_user_content(messages: &[Message]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}
