//! The fixed-point map `psi(u) = u - phi_T(u)` on flat states.

use crate::config::GapToothConfig;
use crate::error::GapToothResult;
use crate::layout::PatchLayout;
use crate::projective::evolve;
use nalgebra::DVector;
use ro_core::timing::{CallCounter, Timer};

/// `psi` for one configuration. Zeros of `psi` are steady states of the
/// gap-tooth evolution over `t_psi`.
pub struct PsiMap {
    cfg: GapToothConfig,
    layout: PatchLayout,
    evaluations: CallCounter,
}

impl PsiMap {
    pub fn new(cfg: GapToothConfig) -> GapToothResult<Self> {
        cfg.validate()?;
        let layout = cfg.layout()?;
        Ok(Self {
            cfg,
            layout,
            evaluations: CallCounter::new(),
        })
    }

    pub fn config(&self) -> &GapToothConfig {
        &self.cfg
    }

    pub fn layout(&self) -> &PatchLayout {
        &self.layout
    }

    /// Number of `psi` evaluations so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.count()
    }

    pub fn evaluations_counter(&self) -> &CallCounter {
        &self.evaluations
    }

    pub fn evaluate(&self, u: &DVector<f64>) -> GapToothResult<DVector<f64>> {
        let n = self.evaluations.hit();
        tracing::debug!(evaluation = n, "psi");
        let timer = Timer::start("psi");

        let patches = self.layout.to_patches(u)?;
        let evolved = evolve(&patches, &self.layout, &self.cfg, self.cfg.t_psi)?;
        let out = u - self.layout.flatten(&evolved)?;

        if let Some(elapsed) = timer.stop() {
            self.evaluations.record(elapsed);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(lambda: f64) -> GapToothConfig {
        GapToothConfig {
            n_teeth: 3,
            points_per_tooth: 5,
            lambda,
            dt: 1e-4,
            big_dt: 4e-4,
            t_patch: 1e-2,
            t_psi: 0.02,
            ..GapToothConfig::default()
        }
    }

    #[test]
    fn zero_is_fixed_without_source() {
        let psi = PsiMap::new(small_config(0.0)).unwrap();
        let out = psi.evaluate(&DVector::zeros(15)).unwrap();
        assert!(out.iter().all(|v| *v == 0.0));
        assert_eq!(psi.evaluations(), 1);
    }

    #[test]
    fn source_pushes_state_up() {
        let psi = PsiMap::new(small_config(1.0)).unwrap();
        let out = psi.evaluate(&DVector::zeros(15)).unwrap();
        // psi = u - phi(u), and phi(0) is positive inside the domain
        assert!(out[7] < 0.0);
        psi.evaluate(&DVector::zeros(15)).unwrap();
        assert_eq!(psi.evaluations(), 2);
    }

    #[test]
    fn wrong_length_rejected() {
        let psi = PsiMap::new(small_config(1.0)).unwrap();
        assert!(psi.evaluate(&DVector::zeros(14)).is_err());
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = GapToothConfig {
            k: 0,
            ..small_config(1.0)
        };
        assert!(PsiMap::new(cfg).is_err());
    }
}
