//! Error types for operator evaluation.

use ro_core::CoreError;
use thiserror::Error;

/// Errors raised while building or evaluating a RandONet.
#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Unsupported configuration: {role} activation '{tag}'")]
    UnsupportedConfiguration { role: &'static str, tag: String },

    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type OperatorResult<T> = Result<T, OperatorError>;
