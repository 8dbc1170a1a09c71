//! Time stepping with boundary re-imposition.
//!
//! Provides:
//! - One-sided extrapolation at the ends of every sub-domain of a state vector
//! - A stepper that applies an external propagator and corrects after each step

pub mod correction;
pub mod error;
pub mod stepper;

pub use correction::{SeamLayout, correct_boundaries, extrapolate};
pub use error::{BoxError, StepperError, StepperResult};
pub use stepper::{BoundaryCorrectedStepper, run, run_segments};
