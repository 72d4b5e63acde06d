//! Error types for manual ingestion.

use thiserror::Error;

/// Result type alias using ManualError.
pub type Result<T> = std::result::Result<T, ManualError>;

/// Errors that can occur while preparing or persisting manual chunks.
///
/// Chunking itself is total; these come from configuration and collaborators.
#[derive(Error, Debug)]
pub enum ManualError {
    /// Configuration rejected at load or construction time.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid argument provided.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Embedding collaborator failed.
    #[error("Embedding error: {message}")]
    Embedding { message: String },

    /// Persistence collaborator failed.
    #[error("Persist error: {message}")]
    Persist { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ManualError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a persistence error.
    pub fn persist(message: impl Into<String>) -> Self {
        Self::Persist {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Embedding { .. } => "EMBEDDING_ERROR",
            Self::Persist { .. } => "PERSIST_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ManualError::config("overlap must be smaller than target_size");
        assert!(err.to_string().contains("overlap must be smaller"));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ManualError::config("x").error_code(), "CONFIG_ERROR");
        assert_eq!(ManualError::embedding("x").error_code(), "EMBEDDING_ERROR");
        assert_eq!(ManualError::persist("x").error_code(), "PERSIST_ERROR");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ManualError::from(io).error_code(), "IO_ERROR");
    }
}
