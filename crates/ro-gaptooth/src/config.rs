//! Experiment configuration.

use crate::error::{GapToothError, GapToothResult};
use crate::layout::PatchLayout;
use ro_core::Tolerances;
use ro_solver::NewtonConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Newton settings for the steady-state solve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewtonSettings {
    pub tol: Tolerances,
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            tol: Tolerances {
                abs: 1e-12,
                rel: 0.0,
            },
            max_iterations: 50,
        }
    }
}

impl NewtonSettings {
    pub fn solver_config(&self) -> NewtonConfig {
        NewtonConfig {
            max_iterations: self.max_iterations,
            ..NewtonConfig::with_tolerances(self.tol)
        }
    }
}

/// Layout, model and time-stepping parameters of a gap-tooth run.
///
/// Every field is optional in a YAML file; missing fields take the defaults
/// of the reference experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GapToothConfig {
    pub n_teeth: usize,
    pub points_per_tooth: usize,
    pub gap_ratio: usize,
    /// Bratu source strength
    pub lambda: f64,
    /// Micro Euler step
    pub dt: f64,
    /// Micro steps per projective cycle
    pub k: usize,
    /// Projective (coarse) step
    pub big_dt: f64,
    /// Horizon between slope rebuilds
    pub t_patch: f64,
    /// Final time of the evolution experiment
    pub t_end: f64,
    /// Horizon of the fixed-point map
    pub t_psi: f64,
    /// Perturbation size for Jacobians of psi
    pub rdiff: f64,
    pub newton: NewtonSettings,
}

impl Default for GapToothConfig {
    fn default() -> Self {
        let dt = 1e-6;
        Self {
            n_teeth: 21,
            points_per_tooth: 15,
            gap_ratio: 1,
            lambda: 1.0,
            dt,
            k: 2,
            big_dt: 4e-6,
            t_patch: 100.0 * dt,
            t_end: 0.5,
            t_psi: 1e-2,
            rdiff: 1e-8,
            newton: NewtonSettings::default(),
        }
    }
}

impl GapToothConfig {
    pub fn layout(&self) -> GapToothResult<PatchLayout> {
        PatchLayout::new(self.n_teeth, self.points_per_tooth, self.gap_ratio)
    }

    pub fn validate(&self) -> GapToothResult<()> {
        self.layout()?;
        ro_core::ensure_finite(self.lambda, "lambda")?;
        if !(self.dt > 0.0) {
            return Err(GapToothError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.k == 0 {
            return Err(GapToothError::InvalidArg {
                what: "k must be at least 1",
            });
        }
        if !(self.big_dt >= self.k as f64 * self.dt) {
            return Err(GapToothError::InvalidArg {
                what: "big_dt must be at least k * dt",
            });
        }
        if !(self.t_patch >= self.big_dt) {
            return Err(GapToothError::InvalidArg {
                what: "t_patch must be at least big_dt",
            });
        }
        if !(self.t_end >= 0.0) || !(self.t_psi > 0.0) {
            return Err(GapToothError::InvalidArg {
                what: "t_end must be non-negative and t_psi positive",
            });
        }
        if !(self.rdiff > 0.0) {
            return Err(GapToothError::InvalidArg {
                what: "rdiff must be positive",
            });
        }
        Ok(())
    }

    pub fn load_yaml(path: &Path) -> GapToothResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
