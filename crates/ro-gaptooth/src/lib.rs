//! Gap-tooth projective integration for the 1-D Bratu problem.
//!
//! The domain `[0, 1]` is covered by small patches ("teeth") separated by gaps.
//! Each tooth carries a micro grid advanced with explicit Euler steps; every
//! few micro steps the solution is projected forward over a larger step. Teeth
//! talk to each other only through boundary slopes taken from a radial-basis
//! interpolant of the tooth end points.
//!
//! Provides:
//! - patch layout and flat/patch conversions
//! - Bratu right-hand side and micro Euler steps with boundary conditions
//! - cubic RBF interpolation of tooth end points
//! - projective integration driver and the fixed-point map `psi(u) = u - phi_T(u)`
//! - steady states by Newton on `psi` and the spectrum of its Jacobian

pub mod analysis;
pub mod bratu;
pub mod config;
pub mod error;
pub mod layout;
pub mod projective;
pub mod psi;
pub mod rbf;

pub use analysis::{Spectrum, SteadyState, jacobian_spectrum, steady_state};
pub use bratu::{Slopes, apply_boundary_conditions, euler_step, rhs, segment_euler_step};
pub use config::{GapToothConfig, NewtonSettings};
pub use error::{GapToothError, GapToothResult};
pub use layout::PatchLayout;
pub use projective::{end_point_slopes, evolve, projective_cycle};
pub use psi::PsiMap;
pub use rbf::CubicRbf;
