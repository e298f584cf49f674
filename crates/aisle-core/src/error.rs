//! Error types for Aisle operations.
//!
//! One `Error` enum and a `Result<T>` alias are shared by every Aisle crate.
//! Conditions that merely mean "nothing there" (an empty query, an empty
//! catalog, a message with no budget) are not errors and never show up here.

use thiserror::Error;

/// Errors that can occur in Aisle operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The embedding provider failed or was unreachable.
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// Vectors and catalog disagree (count or dimension).
    #[error("Inconsistent index: {0}")]
    Inconsistent(String),

    /// The current catalog has no vectors; `rebuild()` has not run since `load()`.
    #[error("Catalog generation {0} has not been indexed")]
    NotIndexed(u64),

    /// A rebuild finished after the catalog it embedded was replaced.
    #[error("Catalog changed during rebuild (embedded generation {built}, current {current})")]
    Stale {
        /// Generation the rebuild embedded.
        built: u64,
        /// Generation installed when the rebuild finished.
        current: u64,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an embedding provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create an index consistency error.
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }

    /// Whether this error came from the embedding provider.
    ///
    /// Callers use this to decide whether to degrade gracefully.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Result type alias using Aisle's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::config("bad key").to_string(),
            "Configuration error: bad key"
        );
        assert_eq!(Error::not_found("product 7").to_string(), "Not found: product 7");
        assert_eq!(
            Error::NotIndexed(3).to_string(),
            "Catalog generation 3 has not been indexed"
        );
    }

    #[test]
    fn test_stale_display() {
        let err = Error::Stale {
            built: 1,
            current: 2,
        };
        assert!(err.to_string().contains("embedded generation 1, current 2"));
    }

    #[test]
    fn test_is_provider() {
        assert!(Error::provider("connection refused").is_provider());
        assert!(!Error::inconsistent("3 vectors for 4 products").is_provider());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
