//! Trunk/branch feature construction and the weighted inner product.

use crate::error::{OperatorError, OperatorResult};
use crate::model::RandONet;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use ro_core::{CoreError, ensure_finite};

/// Evaluate `net` on a batch of input functions.
///
/// * `input` - `nx × ns`, one sampled input function per column
/// * `param` - one homotopy value shared by all samples, or one per sample
/// * `query` - `Ny × d`, one output location per row
///
/// Returns a `(Ny·n_out) × ns` matrix; rows `j·Ny .. (j+1)·Ny` hold channel `j`.
pub fn evaluate(
    net: &RandONet,
    input: &DMatrix<f64>,
    param: &[f64],
    query: &DMatrix<f64>,
) -> OperatorResult<DMatrix<f64>> {
    net.evaluate(input, param, query)
}

impl RandONet {
    /// See [`evaluate`].
    pub fn evaluate(
        &self,
        input: &DMatrix<f64>,
        param: &[f64],
        query: &DMatrix<f64>,
    ) -> OperatorResult<DMatrix<f64>> {
        let trunk = self.trunk_features(query)?;
        let branch = self.branch_features(input, param)?;

        let ny = trunk.nrows();
        let ns = branch.ncols();
        tracing::debug!(ny, ns, n_out = self.n_out(), "evaluating RandONet");

        if self.weights.len() == 1 {
            return Ok(&trunk * &self.weights[0] * &branch);
        }

        let blocks: Vec<DMatrix<f64>> = self
            .weights
            .par_iter()
            .map(|c| &trunk * c * &branch)
            .collect();

        let mut out = DMatrix::zeros(ny * blocks.len(), ns);
        for (j, block) in blocks.iter().enumerate() {
            out.view_mut((j * ny, 0), (ny, ns)).copy_from(block);
        }
        Ok(out)
    }

    /// Evaluate a single input function at a single parameter value.
    pub fn evaluate_single(
        &self,
        input: &DVector<f64>,
        param: f64,
        query: &DMatrix<f64>,
    ) -> OperatorResult<DVector<f64>> {
        let input = DMatrix::from_column_slice(input.len(), 1, input.as_slice());
        let out = self.evaluate(&input, &[param], query)?;
        Ok(out.column(0).into_owned())
    }

    /// `T = tanh(yy·alphat + betat)`, an `Ny × M` matrix.
    pub fn trunk_features(&self, query: &DMatrix<f64>) -> OperatorResult<DMatrix<f64>> {
        if query.ncols() != self.location_dim() {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "query locations have {} coordinates, trunk expects {}",
                    query.ncols(),
                    self.location_dim()
                ),
            });
        }

        let mut t = query * &self.alphat;
        for mut row in t.row_iter_mut() {
            for (k, v) in row.iter_mut().enumerate() {
                *v = self.trunk.apply(*v + self.betat[k]);
            }
        }
        Ok(t)
    }

    /// Branch features `B`, an `Nb × ns` matrix.
    ///
    /// The raw parameter is appended to each input column; the rescaled
    /// parameter only enters through the blend weights.
    pub fn branch_features(
        &self,
        input: &DMatrix<f64>,
        param: &[f64],
    ) -> OperatorResult<DMatrix<f64>> {
        let nx = input.nrows();
        let ns = input.ncols();
        if nx != self.input_len() {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "input functions have {} samples, branch expects {}",
                    nx,
                    self.input_len()
                ),
            });
        }
        let params = broadcast_param(param, ns)?;

        let augmented = DMatrix::from_fn(nx + 1, ns, |i, s| {
            if i < nx { input[(i, s)] } else { params[s] }
        });

        let z0 = &self.alphab0 * &augmented;
        let z1 = &self.alphab1 * &augmented;

        let mut b = DMatrix::zeros(self.branch_width(), ns);
        for s in 0..ns {
            let p = ensure_finite(self.rescale_param(params[s]), "rescaled parameter")?;
            let norm = blend_norm(p, self.config.normalize_blend)?;
            let w0 = (1.0 - p) / norm;
            let w1 = p / norm;
            for r in 0..b.nrows() {
                let z = z0[(r, s)] * w0 + z1[(r, s)] * w1 + self.betab[r];
                b[(r, s)] = self.branch.apply(z);
            }
        }
        Ok(b)
    }
}

/// Blend denominator: `sqrt(p² + (1-p)²)` when enabled, 1 otherwise.
pub fn blend_norm(p: f64, normalize: bool) -> OperatorResult<f64> {
    if !normalize {
        return Ok(1.0);
    }
    let norm = (p * p + (1.0 - p) * (1.0 - p)).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(CoreError::NonFinite {
            what: "homotopy blend normalization",
            value: norm,
        }
        .into());
    }
    Ok(norm)
}

fn broadcast_param(param: &[f64], ns: usize) -> OperatorResult<Vec<f64>> {
    match param.len() {
        1 => Ok(vec![param[0]; ns]),
        n if n == ns => Ok(param.to_vec()),
        n => Err(OperatorError::DimensionMismatch {
            what: format!("{n} parameter values for {ns} input samples"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_norm_disabled_is_one() {
        assert_eq!(blend_norm(0.3, false).unwrap(), 1.0);
    }

    #[test]
    fn blend_norm_endpoints() {
        assert!((blend_norm(0.0, true).unwrap() - 1.0).abs() < 1e-15);
        assert!((blend_norm(1.0, true).unwrap() - 1.0).abs() < 1e-15);
        assert!((blend_norm(0.5, true).unwrap() - 0.5_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn broadcast_single_param() {
        assert_eq!(broadcast_param(&[2.0], 3).unwrap(), vec![2.0, 2.0, 2.0]);
        assert_eq!(broadcast_param(&[1.0, 2.0], 2).unwrap(), vec![1.0, 2.0]);
        assert!(broadcast_param(&[1.0, 2.0], 3).is_err());
        assert!(broadcast_param(&[], 3).is_err());
    }
}
