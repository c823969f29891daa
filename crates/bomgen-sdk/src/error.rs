//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pattern text that is not valid YAML
    #[error("Parser error: {0}")]
    ParseError(#[from] bomgen_parser::ParseError),

    /// BOM resolution error
    #[error("Resolution error: {0}")]
    ResolutionError(#[from] bomgen_runtime::ResolutionError),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
