//! Dense nonlinear solver utilities: Newton iteration with backtracking and
//! finite-difference Jacobians.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{BoxError, SolverError, SolverResult};
pub use jacobian::{
    central_difference_jacobian, finite_difference_jacobian, finite_difference_jacobian_at,
};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
