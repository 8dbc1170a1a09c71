//! Tooth/gap layout on the unit interval.

use crate::error::{GapToothError, GapToothResult};
use nalgebra::{DMatrix, DVector};

/// Teeth of equal size placed on `linspace(0, 1, N)` with equal gaps between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchLayout {
    n_teeth: usize,
    points_per_tooth: usize,
    gap_ratio: usize,
}

impl PatchLayout {
    pub fn new(n_teeth: usize, points_per_tooth: usize, gap_ratio: usize) -> GapToothResult<Self> {
        if n_teeth == 0 {
            return Err(GapToothError::InvalidArg {
                what: "n_teeth must be positive",
            });
        }
        if points_per_tooth < 3 {
            return Err(GapToothError::InvalidArg {
                what: "points_per_tooth must be at least 3",
            });
        }
        if gap_ratio == 0 {
            return Err(GapToothError::InvalidArg {
                what: "gap_ratio must be positive",
            });
        }
        Ok(Self {
            n_teeth,
            points_per_tooth,
            gap_ratio,
        })
    }

    pub fn n_teeth(&self) -> usize {
        self.n_teeth
    }

    pub fn points_per_tooth(&self) -> usize {
        self.points_per_tooth
    }

    /// Interior grid points strictly between two neighbouring teeth.
    pub fn points_per_gap(&self) -> usize {
        self.gap_ratio * (self.points_per_tooth - 1) - 1
    }

    /// Points on the full global grid.
    pub fn total_points(&self) -> usize {
        self.n_teeth * self.points_per_tooth + (self.n_teeth - 1) * self.points_per_gap()
    }

    pub fn dx(&self) -> f64 {
        1.0 / (self.total_points() - 1) as f64
    }

    /// Length of the flattened patch state.
    pub fn flat_len(&self) -> usize {
        self.n_teeth * self.points_per_tooth
    }

    /// Global grid index of the first point of tooth `k`.
    pub fn tooth_start(&self, k: usize) -> usize {
        k * (self.points_per_gap() + self.points_per_tooth)
    }

    /// Coordinates of the micro grid of tooth `k`.
    pub fn tooth_grid(&self, k: usize) -> Vec<f64> {
        let start = self.tooth_start(k);
        let dx = self.dx();
        (start..start + self.points_per_tooth)
            .map(|i| i as f64 * dx)
            .collect()
    }

    pub fn tooth_grids(&self) -> Vec<Vec<f64>> {
        (0..self.n_teeth).map(|k| self.tooth_grid(k)).collect()
    }

    /// Sample `f` on every tooth, one row per tooth.
    pub fn sample<F: Fn(f64) -> f64>(&self, f: F) -> DMatrix<f64> {
        let grids = self.tooth_grids();
        DMatrix::from_fn(self.n_teeth, self.points_per_tooth, |k, j| f(grids[k][j]))
    }

    /// Split a flat state (teeth concatenated) into patch rows.
    pub fn to_patches(&self, u: &DVector<f64>) -> GapToothResult<DMatrix<f64>> {
        if u.len() != self.flat_len() {
            return Err(GapToothError::Layout {
                what: format!(
                    "flat state has length {}, layout holds {} points",
                    u.len(),
                    self.flat_len()
                ),
            });
        }
        let m = self.points_per_tooth;
        Ok(DMatrix::from_fn(self.n_teeth, m, |k, j| u[k * m + j]))
    }

    /// Concatenate patch rows into a flat state.
    pub fn flatten(&self, patches: &DMatrix<f64>) -> GapToothResult<DVector<f64>> {
        self.check_patches(patches)?;
        let m = self.points_per_tooth;
        Ok(DVector::from_fn(self.flat_len(), |i, _| patches[(i / m, i % m)]))
    }

    pub(crate) fn check_patches(&self, patches: &DMatrix<f64>) -> GapToothResult<()> {
        if patches.shape() != (self.n_teeth, self.points_per_tooth) {
            return Err(GapToothError::Layout {
                what: format!(
                    "patch state is {:?}, layout expects {:?}",
                    patches.shape(),
                    (self.n_teeth, self.points_per_tooth)
                ),
            });
        }
        Ok(())
    }
}
