//! Error types for script generation
//!
//! The pipeline itself never fails: unclassifiable requests, missing templates and unparsable
//! values are reported through [`GenerationResult`](super::GenerationResult). These errors cover
//! everything around it (template loading, the audit log, configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations around the generation pipeline
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors raised by the collaborators of the generation pipeline
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Request is empty")]
    EmptyRequest,

    #[error("Template library not found: {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid audit log entry: {0}")]
    InvalidLogEntry(String),

    #[error("Audit log error: {0}")]
    AuditLogError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GeneratorError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GeneratorError::EmptyRequest => "Please enter a request.".to_string(),
            GeneratorError::LibraryNotFound(path) => format!(
                "No template library at {}. Point --library (or library_dir in config.toml) \
                 at a directory of SQL templates.",
                path.display()
            ),
            GeneratorError::ConfigurationError(msg) => {
                format!("Configuration issue: {msg}. Check your config file.")
            }
            GeneratorError::ConfigParseError(e) => {
                format!("Could not parse config file: {e}")
            }
            GeneratorError::AuditLogError(e) => format!("Audit log unavailable: {e}"),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found_mentions_path() {
        let err = GeneratorError::LibraryNotFound(PathBuf::from("/tmp/nowhere"));
        assert!(err.to_string().contains("/tmp/nowhere"));
        assert!(err.user_message().contains("--library"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GeneratorError = io.into();
        assert!(matches!(err, GeneratorError::IoError(_)));
        assert_eq!(err.user_message(), "IO error: denied");
    }
}
