//! Parametric RandONet (random projection-based operator network) evaluation.
//!
//! A fitted network maps an input function sampled on a grid, together with a
//! scalar homotopy parameter, to an output function sampled at arbitrary query
//! locations. The prediction is the weighted inner product `T·C·B` of trunk
//! features `T` (random tanh features of the query locations) and branch
//! features `B` (the input function blended between two endpoint transforms).

pub mod activation;
pub mod error;
pub mod evaluate;
pub mod io;
pub mod model;
pub mod schema;

pub use activation::Activation;
pub use error::{OperatorError, OperatorResult};
pub use evaluate::evaluate;
pub use io::{load_model, load_request};
pub use model::{EvalConfig, RandONet, RandONetParams};
pub use schema::{EvalRequest, RandONetDef};
