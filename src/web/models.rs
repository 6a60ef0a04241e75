use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Optional behaviours a caller can switch on for one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TutorTool {
    #[serde(rename = "pedagogy_prompt")]
    PedagogyPrompt,
    #[serde(rename = "RAG")]
    Rag,
    // Accepted, no effect yet.
    #[serde(rename = "guardrails")]
    Guardrails,
    #[serde(rename = "evaluator")]
    Evaluator,
    #[serde(other)]
    Unknown,
}

// Explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    /// Mock session token, never validated.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tutor_tools: Vec<TutorTool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_rag: bool,
}

impl ChatRequest {
    pub fn wants(&self, tool: TutorTool) -> bool {
        self.tutor_tools.contains(&tool) || (tool == TutorTool::Rag && self.use_rag)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub status: String,
}

impl ChatResponse {
    pub fn success(reply: String) -> Self {
        Self {
            reply,
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct StartupQuery {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
