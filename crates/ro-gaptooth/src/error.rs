//! Error types for gap-tooth integration.

use ro_core::CoreError;
use ro_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GapToothError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Layout error: {what}")]
    Layout { what: String },

    #[error("Interpolation system is singular ({points} end points)")]
    SingularInterpolant { points: usize },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type GapToothResult<T> = Result<T, GapToothError>;
