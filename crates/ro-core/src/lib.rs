//! ro-core: shared foundation for the randonet workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)
//! - timing (opt-in wall-clock instrumentation)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
