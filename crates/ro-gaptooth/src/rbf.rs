//! One-dimensional cubic radial-basis interpolation.
//!
//! `s(x) = Σ wᵢ·|x − xᵢ|³ + c₀ + c₁·x` with the side conditions
//! `Σ wᵢ = Σ wᵢ·xᵢ = 0`, solved densely.

use crate::error::{GapToothError, GapToothResult};
use nalgebra::{DMatrix, DVector};

#[derive(Clone, Debug)]
pub struct CubicRbf {
    centers: Vec<f64>,
    weights: Vec<f64>,
    c0: f64,
    c1: f64,
}

impl CubicRbf {
    /// Interpolate `values` at `centers`. Centers must be distinct; at least two are needed.
    pub fn fit(centers: &[f64], values: &[f64]) -> GapToothResult<Self> {
        let n = centers.len();
        if n != values.len() {
            return Err(GapToothError::InvalidArg {
                what: "centers and values must have the same length",
            });
        }
        if n < 2 {
            return Err(GapToothError::InvalidArg {
                what: "cubic RBF needs at least two centers",
            });
        }

        let size = n + 2;
        let mut a = DMatrix::zeros(size, size);
        for i in 0..n {
            for j in 0..n {
                a[(i, j)] = (centers[i] - centers[j]).abs().powi(3);
            }
            a[(i, n)] = 1.0;
            a[(i, n + 1)] = centers[i];
            a[(n, i)] = 1.0;
            a[(n + 1, i)] = centers[i];
        }

        let mut b = DVector::zeros(size);
        for (i, v) in values.iter().enumerate() {
            b[i] = *v;
        }

        let sol = a
            .lu()
            .solve(&b)
            .ok_or(GapToothError::SingularInterpolant { points: n })?;

        Ok(Self {
            centers: centers.to_vec(),
            weights: sol.rows(0, n).iter().copied().collect(),
            c0: sol[n],
            c1: sol[n + 1],
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let radial: f64 = self
            .centers
            .iter()
            .zip(&self.weights)
            .map(|(c, w)| w * (x - c).abs().powi(3))
            .sum();
        radial + self.c0 + self.c1 * x
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let radial: f64 = self
            .centers
            .iter()
            .zip(&self.weights)
            .map(|(c, w)| {
                let d = x - c;
                3.0 * w * d * d.abs()
            })
            .sum();
        radial + self.c1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_linear_data() {
        let xs = [0.0, 0.2, 0.5, 0.9, 1.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 - 3.0 * x).collect();
        let rbf = CubicRbf::fit(&xs, &ys).unwrap();
        for x in [0.0, 0.3, 0.77, 1.0] {
            assert!((rbf.evaluate(x) - (2.0 - 3.0 * x)).abs() < 1e-10);
            assert!((rbf.derivative(x) + 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn interpolates_at_centers() {
        let xs = [0.0, 0.25, 0.4, 0.6, 0.75, 1.0];
        let ys: Vec<f64> = xs.iter().map(|x| (3.0_f64 * x).sin()).collect();
        let rbf = CubicRbf::fit(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert!((rbf.evaluate(*x) - y).abs() < 1e-10);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let xs = [0.0, 0.3, 0.45, 0.8, 1.0];
        let ys = [0.0, 0.4, -0.2, 0.1, 0.0];
        let rbf = CubicRbf::fit(&xs, &ys).unwrap();
        let h = 1e-6;
        for x in [0.1, 0.5, 0.9] {
            let fd = (rbf.evaluate(x + h) - rbf.evaluate(x - h)) / (2.0 * h);
            assert!((rbf.derivative(x) - fd).abs() < 1e-6);
        }
    }

    #[test]
    fn duplicate_centers_are_singular() {
        let err = CubicRbf::fit(&[0.5, 0.5], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, GapToothError::SingularInterpolant { .. }));
    }

    #[test]
    fn too_few_centers_rejected() {
        assert!(CubicRbf::fit(&[0.5], &[1.0]).is_err());
        assert!(CubicRbf::fit(&[0.0, 1.0], &[1.0]).is_err());
    }
}
