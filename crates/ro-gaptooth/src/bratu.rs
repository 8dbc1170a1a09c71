//! Bratu dynamics `u_t = u_xx + λ·eᵘ` on tooth micro grids.

use crate::error::{GapToothError, GapToothResult};
use nalgebra::{DMatrix, DVector};

/// Outward slopes at the left and right end of every tooth.
#[derive(Clone, Debug, PartialEq)]
pub struct Slopes {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl Slopes {
    pub fn zeros(n_teeth: usize) -> Self {
        Self {
            left: vec![0.0; n_teeth],
            right: vec![0.0; n_teeth],
        }
    }
}

/// Central Laplacian plus the exponential source on every tooth row.
///
/// Rows wrap around at their ends; those entries are overwritten by the
/// boundary conditions after each step.
pub fn rhs(u: &DMatrix<f64>, dx: f64, lambda: f64) -> DMatrix<f64> {
    let cols = u.ncols();
    let inv_dx2 = 1.0 / (dx * dx);
    DMatrix::from_fn(u.nrows(), cols, |k, j| {
        let next = u[(k, (j + 1) % cols)];
        let prev = u[(k, (j + cols - 1) % cols)];
        let here = u[(k, j)];
        (next - 2.0 * here + prev) * inv_dx2 + lambda * here.exp()
    })
}

/// Dirichlet zero at both ends of the global domain, Neumann with the given
/// slopes at tooth ends facing a gap.
pub fn apply_boundary_conditions(u: &mut DMatrix<f64>, slopes: &Slopes, dx: f64) {
    let (n, m) = u.shape();
    u[(0, 0)] = 0.0;
    u[(n - 1, m - 1)] = 0.0;
    if n > 1 {
        for k in 1..n {
            u[(k, 0)] = u[(k, 1)] - slopes.left[k] * dx;
        }
        for k in 0..n - 1 {
            u[(k, m - 1)] = u[(k, m - 2)] + slopes.right[k] * dx;
        }
    }
}

/// One forward Euler micro step on all teeth, followed by the boundary conditions.
pub fn euler_step(u: &DMatrix<f64>, dx: f64, dt: f64, slopes: &Slopes, lambda: f64) -> DMatrix<f64> {
    let mut next = u + rhs(u, dx, lambda) * dt;
    apply_boundary_conditions(&mut next, slopes, dx);
    next
}

/// Forward Euler step on a flat vector split into `segments` equal sub-domains.
///
/// Only interior points of each segment are advanced; segment end points are
/// returned unchanged so a caller can impose its own boundary values.
pub fn segment_euler_step(
    u: &DVector<f64>,
    segments: usize,
    dx: f64,
    dt: f64,
    lambda: f64,
) -> GapToothResult<DVector<f64>> {
    if segments == 0 || u.len() % segments != 0 || u.len() / segments < 3 {
        return Err(GapToothError::Layout {
            what: format!(
                "cannot split {} points into {} segments of at least 3",
                u.len(),
                segments
            ),
        });
    }
    let len = u.len() / segments;
    let inv_dx2 = 1.0 / (dx * dx);
    let mut next = u.clone();
    for s in 0..segments {
        let start = s * len;
        for i in start + 1..start + len - 1 {
            let lap = (u[i + 1] - 2.0 * u[i] + u[i - 1]) * inv_dx2;
            next[i] = u[i] + dt * (lap + lambda * u[i].exp());
        }
    }
    Ok(next)
}
