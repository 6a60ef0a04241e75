use std::path::PathBuf;

use log::warn;
use tera::{Context, Tera};

use crate::error::{AssistantError, Result};

const SYSTEM_PROMPT: &str = "system_prompt.md";
const PEDAGOGICAL_PROMPT: &str = "pedagogical_prompt.md";
const SESSION_BEGINNING_PROMPT: &str = "session_beginning_prompt.md";
const STARTUP_TEXT: &str = "chat_startup_text.md";

/// Read-only prompt assets, loaded from disk on every call.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn load(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AssistantError::FileAccess { path, source })
    }

    /// Tutor persona, always the first block of the system message.
    pub async fn system_prompt(&self) -> Result<String> {
        self.load(SYSTEM_PROMPT).await
    }

    pub async fn pedagogical_prompt(&self) -> Result<String> {
        self.load(PEDAGOGICAL_PROMPT).await
    }

    /// Greeting shown before the first turn.
    pub async fn startup_text(&self) -> Result<String> {
        self.load(STARTUP_TEXT).await
    }

    /// Session-opening prompt with `{{ TOPIC }}` filled in. A template that
    /// fails to render is returned as-is.
    pub async fn session_beginning(&self, topic: &str) -> Result<String> {
        let template = self.load(SESSION_BEGINNING_PROMPT).await?;
        Ok(render_topic(&template, topic))
    }
}

fn render_topic(template: &str, topic: &str) -> String {
    let mut context = Context::new();
    context.insert("TOPIC", topic);

    match Tera::one_off(template, &context, false) {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!("Session beginning template did not render: {}", e);
            template.to_string()
        }
    }
}
