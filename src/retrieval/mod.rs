//! Retrieval of grounding passages for the tutor's system prompt.

pub mod chroma;

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};

use crate::error::{AssistantError, Result};

pub use chroma::{ChromaCollection, ChromaRetriever};

/// Passages fetched per query.
pub const TOP_K: usize = 6;

/// Longest excerpt, in characters, quoted from one passage.
pub const EXCERPT_CHARS: usize = 800;

const CONTEXT_HEADER: &str = "CONTEXT (for factual grounding, not to be shown to the user):\n";
const CONTEXT_LABEL: &str = "RAG context: ";
const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// A stored passage returned by a similarity search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Passage {
    pub text: String,
    pub metadata: Map<String, Value>,
}

/// A similarity-search backend over a precomputed index.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>>;
}

/// Turns a query into a framed block of source-attributed excerpts.
#[derive(Clone, Default)]
pub struct ContextRetriever {
    provider: Option<Arc<dyn SimilaritySearch>>,
}

impl ContextRetriever {
    pub fn new(provider: Arc<dyn SimilaritySearch>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A retriever with nothing registered; every fetch fails.
    pub fn unavailable() -> Self {
        Self { provider: None }
    }

    /// Provider errors are returned unchanged; the caller decides how to degrade.
    pub async fn fetch_context(&self, query: &str) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(AssistantError::UninitializedDependency("Vector retriever"))?;

        let passages = provider.search(query, TOP_K).await?;
        debug!("Retrieved {} passages for query", passages.len());

        let blocks: Vec<String> = passages.iter().map(format_snippet).collect();
        Ok(format!(
            "{}{}{}",
            CONTEXT_HEADER,
            CONTEXT_LABEL,
            blocks.join(BLOCK_SEPARATOR)
        ))
    }
}

/// `[SOURCE: name, page n]` followed by at most [`EXCERPT_CHARS`] characters.
pub fn format_snippet(passage: &Passage) -> String {
    let source = match passage.metadata.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "unknown".to_string(),
        Some(other) => other.to_string(),
    };

    let page = match passage.metadata.get("page") {
        Some(Value::Null) | None => String::new(),
        Some(Value::String(s)) => format!(", page {}", s),
        Some(other) => format!(", page {}", other),
    };

    let excerpt: String = passage.text.chars().take(EXCERPT_CHARS).collect();
    format!("[SOURCE: {}{}]\n{}", source, page, excerpt)
}
