//! Parsing of a router model's plan: which route to take and whether to
//! retrieve context. Model output is free text, so parsing is forgiving.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagChoice {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterDecision {
    pub route: String,
    #[serde(rename = "RAG")]
    pub rag: RagChoice,
    pub reason: String,
}

impl RouterDecision {
    /// Returned whenever the plan cannot be read.
    pub fn fallback() -> Self {
        Self {
            route: "suora".to_string(),
            rag: RagChoice::No,
            reason: "fallback: invalid json".to_string(),
        }
    }
}

/// Never fails; anything unreadable becomes [`RouterDecision::fallback`].
pub fn parse_plan(text: &str) -> RouterDecision {
    let body = strip_code_fence(text);

    if let Ok(decision) = serde_json::from_str(body) {
        return decision;
    }

    // First `{` through last `}`, for plans wrapped in prose.
    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            if let Ok(decision) = serde_json::from_str(&body[start..=end]) {
                return decision;
            }
        }
    }

    RouterDecision::fallback()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    let rest = rest.strip_suffix('\n').unwrap_or(rest);
    rest.trim()
}
