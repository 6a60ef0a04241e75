//! Tutoring chatbot backend: composes a system prompt from persona,
//! pedagogy and retrieved context, then forwards the conversation to a
//! locally served language model.

pub mod assistant;
pub mod config;
pub mod error;
pub mod model;
pub mod retrieval;
pub mod web;

use assistant::Assistant;

// App state structure
pub struct AppState {
    pub assistant: Assistant,
}
