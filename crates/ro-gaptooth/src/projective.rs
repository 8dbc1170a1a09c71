//! Projective integration over all teeth at once.

use crate::bratu::{Slopes, apply_boundary_conditions, euler_step};
use crate::config::GapToothConfig;
use crate::error::{GapToothError, GapToothResult};
use crate::layout::PatchLayout;
use crate::rbf::CubicRbf;
use nalgebra::DMatrix;
use ro_core::CoreError;

/// Slopes at every tooth end from a cubic RBF through all tooth end points.
pub fn end_point_slopes(u: &DMatrix<f64>, layout: &PatchLayout) -> GapToothResult<Slopes> {
    layout.check_patches(u)?;
    let n = layout.n_teeth();
    let last = layout.points_per_tooth() - 1;
    let grids = layout.tooth_grids();

    let mut x_end = Vec::with_capacity(2 * n);
    let mut u_end = Vec::with_capacity(2 * n);
    for k in 0..n {
        x_end.push(grids[k][0]);
        x_end.push(grids[k][last]);
        u_end.push(u[(k, 0)]);
        u_end.push(u[(k, last)]);
    }
    let spline = CubicRbf::fit(&x_end, &u_end)?;

    Ok(Slopes {
        left: grids.iter().map(|g| spline.derivative(g[0])).collect(),
        right: grids.iter().map(|g| spline.derivative(g[last])).collect(),
    })
}

/// One projective cycle of length `big_dt`: `k` Euler steps, a time-derivative
/// estimate from the last two, extrapolation over the remaining `big_dt - k·dt`.
pub fn projective_cycle(
    u: &DMatrix<f64>,
    dx: f64,
    slopes: &Slopes,
    cfg: &GapToothConfig,
) -> DMatrix<f64> {
    let mut cur = u.clone();
    for _ in 0..cfg.k.saturating_sub(1) {
        cur = euler_step(&cur, dx, cfg.dt, slopes, cfg.lambda);
    }
    let prev = cur.clone();
    cur = euler_step(&cur, dx, cfg.dt, slopes, cfg.lambda);

    let du_dt = (&cur - &prev) / cfg.dt;
    cur += du_dt * (cfg.big_dt - cfg.k as f64 * cfg.dt);

    apply_boundary_conditions(&mut cur, slopes, dx);
    cur
}

/// Advance patch state `u0` over `horizon`.
///
/// Slopes are rebuilt every `t_patch`; in between, `t_patch / big_dt`
/// projective cycles run with fixed slopes.
pub fn evolve(
    u0: &DMatrix<f64>,
    layout: &PatchLayout,
    cfg: &GapToothConfig,
    horizon: f64,
) -> GapToothResult<DMatrix<f64>> {
    cfg.validate()?;
    if !horizon.is_finite() || horizon < 0.0 {
        return Err(GapToothError::InvalidArg {
            what: "horizon must be finite and non-negative",
        });
    }
    layout.check_patches(u0)?;
    let dx = layout.dx();
    let n_patch_steps = (horizon / cfg.t_patch).round() as usize;
    let n_pi_steps = (cfg.t_patch / cfg.big_dt).round() as usize;

    let mut u = u0.clone();
    for p in 1..=n_patch_steps {
        tracing::trace!(t = p as f64 * cfg.t_patch, "patch step");
        let slopes = end_point_slopes(&u, layout)?;
        for _ in 0..n_pi_steps {
            u = projective_cycle(&u, dx, &slopes, cfg);
        }
        if let Some(bad) = u.iter().find(|v| !v.is_finite()) {
            return Err(CoreError::NonFinite {
                what: "gap-tooth state",
                value: *bad,
            }
            .into());
        }
    }
    Ok(u)
}
