//! Steady states of the gap-tooth scheme and the spectrum of `psi` around them.

use crate::error::{GapToothError, GapToothResult};
use crate::psi::PsiMap;
use nalgebra::{Complex, DVector};
use ro_solver::{
    SolverError, SolverResult, finite_difference_jacobian, finite_difference_jacobian_at,
    newton_solve,
};

/// Result of the steady-state solve.
#[derive(Clone, Debug)]
pub struct SteadyState {
    /// Flat state (teeth concatenated)
    pub u: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub psi_evaluations: u64,
}

/// Eigenvalues of the Jacobian of `psi` at a state.
#[derive(Clone, Debug)]
pub struct Spectrum {
    /// Norm of `psi` at the linearisation point
    pub psi_norm: f64,
    /// Sorted by increasing modulus
    pub eigenvalues: Vec<Complex<f64>>,
}

impl Spectrum {
    /// The `count` eigenvalues of smallest modulus.
    pub fn smallest(&self, count: usize) -> &[Complex<f64>] {
        &self.eigenvalues[..count.min(self.eigenvalues.len())]
    }
}

fn residual_of(psi: &PsiMap) -> impl Fn(&DVector<f64>) -> SolverResult<DVector<f64>> + Copy + '_ {
    move |u: &DVector<f64>| psi.evaluate(u).map_err(SolverError::residual)
}

/// Unwrap a `psi` failure carried through the solver back to its own error.
fn restore_cause(e: SolverError) -> GapToothError {
    match e {
        SolverError::Residual { source } => match source.downcast::<GapToothError>() {
            Ok(cause) => *cause,
            Err(source) => GapToothError::Solver(SolverError::Residual { source }),
        },
        other => GapToothError::Solver(other),
    }
}

/// Solve `psi(u) = 0` by Newton from `u0` with a finite-difference Jacobian.
pub fn steady_state(psi: &PsiMap, u0: DVector<f64>) -> GapToothResult<SteadyState> {
    let cfg = psi.config();
    let residual = residual_of(psi);
    let jacobian = |u: &DVector<f64>| finite_difference_jacobian(u, residual, cfg.rdiff);

    let start = psi.evaluations();
    let result = newton_solve(u0, residual, jacobian, &cfg.newton.solver_config())
        .map_err(restore_cause)?;
    let psi_evaluations = psi.evaluations() - start;

    tracing::info!(
        iterations = result.iterations,
        residual = result.residual_norm,
        psi_evaluations,
        "steady state converged"
    );

    Ok(SteadyState {
        u: result.x,
        residual_norm: result.residual_norm,
        iterations: result.iterations,
        psi_evaluations,
    })
}

/// Dense Jacobian of `psi` at `u` and its eigenvalues.
///
/// Costs `len(u) + 1` evaluations of `psi`.
pub fn jacobian_spectrum(psi: &PsiMap, u: &DVector<f64>) -> GapToothResult<Spectrum> {
    let psi_u = psi.evaluate(u)?;
    let psi_norm = psi_u.norm();
    let jac = finite_difference_jacobian_at(u, &psi_u, residual_of(psi), psi.config().rdiff)
        .map_err(restore_cause)?;

    let mut eigenvalues: Vec<Complex<f64>> = jac.complex_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| a.norm().total_cmp(&b.norm()));

    tracing::info!(psi_norm, dim = eigenvalues.len(), "jacobian spectrum computed");
    Ok(Spectrum {
        psi_norm,
        eigenvalues,
    })
}
