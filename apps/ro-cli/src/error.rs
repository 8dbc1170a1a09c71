use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Operator error: {0}")]
    Operator(#[from] ro_operator::OperatorError),

    #[error("Stepper error: {0}")]
    Stepper(#[from] ro_stepper::StepperError),

    #[error("Gap-tooth error: {0}")]
    GapTooth(#[from] ro_gaptooth::GapToothError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
