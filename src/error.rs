use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the tutoring core and its provider boundaries.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A prompt asset could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A provider that should have been registered at startup is missing.
    #[error("{0} not initialized")]
    UninitializedDependency(&'static str),

    /// Transport or status failure from an external provider.
    #[error("{0}")]
    Provider(String),

    /// The provider answered, but its body could not be decoded.
    #[error("Failed to decode provider reply: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AssistantError::Decode(err.to_string())
        } else {
            AssistantError::Provider(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
