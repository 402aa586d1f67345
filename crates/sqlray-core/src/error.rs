//! Error types for sqlray

use thiserror::Error;

/// Core error type for sqlray operations
#[derive(Error, Debug)]
pub enum SqlrayError {
    /// A referenced table or other catalog entry does not exist.
    #[error("Catalog error: {0}")]
    CatalogNotFound(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlrayError {
    /// Returns true if the error reports a missing table
    pub fn is_catalog_not_found(&self) -> bool {
        matches!(self, Self::CatalogNotFound(_))
    }
}

/// Result type alias for sqlray operations
pub type Result<T> = std::result::Result<T, SqlrayError>;
