//! Newton solver with backtracking line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use ro_core::Tolerances;

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (relative to the initial residual)
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

impl NewtonConfig {
    pub fn with_tolerances(tol: Tolerances) -> Self {
        Self {
            abs_tol: tol.abs,
            rel_tol: tol.rel,
            ..Self::default()
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Newton solver with backtracking on the residual norm.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        tracing::debug!(iter, residual = r_norm, "newton iteration");

        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "Jacobian solve failed".to_string(),
            })?;

        // Backtrack until the residual norm decreases; x only moves on success.
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            let r_new = residual_fn(&x_new)?;
            let r_new_norm = r_new.norm();
            if r_new_norm.is_finite() && r_new_norm < r_norm {
                accepted = Some((x_new, r_new, r_new_norm));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!(
                    "Line search stagnated at iteration {}, residual = {}",
                    iter, r_norm
                ),
            });
        };
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
            converged: true,
        });
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jacobian::finite_difference_jacobian;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 from x0 = 3
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn coupled_system_with_fd_jacobian() {
        // x + y = 3, x*y = 2 -> (1, 2) from (0.5, 2.5)
        let residual = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0] + v[1] - 3.0, v[0] * v[1] - 2.0]))
        };
        let jacobian = |v: &DVector<f64>| finite_difference_jacobian(v, residual, 1e-8);

        let config = NewtonConfig::with_tolerances(Tolerances {
            abs: 1e-10,
            rel: 0.0,
        });
        let result =
            newton_solve(DVector::from_vec(vec![0.5, 2.5]), residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 1.0).abs() < 1e-6);
        assert!((result.x[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn singular_jacobian_is_reported() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let jacobian =
            |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(DMatrix::zeros(1, 1)) };

        let err = newton_solve(
            DVector::from_element(1, 0.0),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Numeric { .. }));
    }

    #[test]
    fn residual_errors_propagate() {
        let residual = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Err(SolverError::residual("model failed"))
        };
        let jacobian =
            |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };
        let err = newton_solve(
            DVector::from_element(1, 0.0),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("model failed"));
    }

    #[test]
    fn uphill_direction_stagnates_without_moving() {
        // x^2 + 1 has no root; J = -1 points uphill from x = 1
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let jacobian = |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, -1.0))
        };
        let config = NewtonConfig {
            max_iterations: 3,
            ..NewtonConfig::default()
        };

        let err = newton_solve(DVector::from_element(1, 1.0), residual, jacobian, &config)
            .unwrap_err();
        match err {
            SolverError::ConvergenceFailed { what } => {
                assert!(what.contains("stagnated at iteration 0"), "{what}");
                // the uphill step was never taken
                assert!(what.ends_with("residual = 2"), "{what}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn residual_source_is_kept() {
        let residual = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Err(SolverError::residual(std::io::Error::other("disk gone")))
        };
        let jacobian =
            |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };
        let err = newton_solve(
            DVector::from_element(1, 0.0),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }
}
