//! Question catalog errors.

use thiserror::Error;

/// Errors raised while loading or validating a question catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog parsed but breaks a structural rule.
    #[error("Validation error: {0}")]
    Validation(String),
}
