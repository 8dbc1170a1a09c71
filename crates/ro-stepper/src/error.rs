//! Error types for stepping.

use thiserror::Error;

/// Error raised by an external propagator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum StepperError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    #[error("Propagator failed at step {step}: {source}")]
    PropagatorFailure {
        step: usize,
        #[source]
        source: BoxError,
    },
}

pub type StepperResult<T> = Result<T, StepperError>;
