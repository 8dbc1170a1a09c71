//! Error types for solver operations.

use ro_core::CoreError;
use thiserror::Error;

/// Error raised by a caller-supplied residual.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Residual evaluation failed: {source}")]
    Residual {
        #[source]
        source: BoxError,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub fn residual<E: Into<BoxError>>(e: E) -> Self {
        SolverError::Residual { source: e.into() }
    }
}

impl From<CoreError> for SolverError {
    fn from(e: CoreError) -> Self {
        SolverError::Numeric {
            what: e.to_string(),
        }
    }
}
