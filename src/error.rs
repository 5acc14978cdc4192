use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CustomizeError>;

/// Errors that can occur while loading tables or serving a customization
#[derive(Error, Debug)]
pub enum CustomizeError {
    /// A table or recipe file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table document is not valid JSON or has the wrong shape
    #[error("Failed to parse {table} table: {source}")]
    TableParse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A table parsed but contains unusable entries
    #[error("Invalid {table} table: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The requested recipe does not exist in the repository
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// Failed to reach the LLM provider
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The LLM provider answered with something unusable
    #[error("LLM provider error: {0}")]
    Llm(String),
}

impl CustomizeError {
    /// Whether the error means the service cannot function at all.
    ///
    /// Table and configuration failures happen at startup; transports should
    /// report them as service-unavailable rather than as a bad request.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CustomizeError::Io { .. }
                | CustomizeError::TableParse { .. }
                | CustomizeError::InvalidTable { .. }
                | CustomizeError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_errors_are_unavailable() {
        let err = CustomizeError::InvalidTable {
            table: "allergen",
            reason: "empty category name".to_string(),
        };
        assert!(err.is_unavailable());
        assert_eq!(
            err.to_string(),
            "Invalid allergen table: empty category name"
        );
    }

    #[test]
    fn test_lookup_errors_are_not_unavailable() {
        let err = CustomizeError::RecipeNotFound("42".to_string());
        assert!(!err.is_unavailable());
        assert_eq!(err.to_string(), "Recipe not found: 42");
    }
}
