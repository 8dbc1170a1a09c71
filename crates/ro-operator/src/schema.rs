//! On-disk model and request formats.

use crate::activation::{resolve_branch, resolve_trunk};
use crate::error::{OperatorError, OperatorResult};
use crate::model::{EvalConfig, RandONet, RandONetParams};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Deserializer, Serialize};

/// Serialized RandONet. Matrices are stored as lists of rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandONetDef {
    pub trunk_activation: String,
    pub branch_activation: String,
    pub alphat: Vec<Vec<f64>>,
    pub betat: Vec<f64>,
    pub alphab0: Vec<Vec<f64>>,
    pub alphab1: Vec<Vec<f64>>,
    pub betab: Vec<f64>,
    /// One `M × Nb` matrix per output channel.
    #[serde(alias = "C")]
    pub weights: Vec<Vec<Vec<f64>>>,
    pub param0: f64,
    pub dparam: f64,
    #[serde(default, deserialize_with = "flag_from_bool_or_int")]
    pub flag_norm: bool,
    #[serde(default = "default_n_out")]
    pub n_out: usize,
}

fn default_n_out() -> usize {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
}

// Accepts `true`/`false` as well as `0`/`1`.
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => b,
        FlagRepr::Int(i) => i != 0,
    })
}

impl RandONetDef {
    /// Resolve activation tags and build the validated network.
    pub fn build(&self) -> OperatorResult<RandONet> {
        let params = RandONetParams {
            trunk: resolve_trunk(&self.trunk_activation)?,
            branch: resolve_branch(&self.branch_activation)?,
            alphat: matrix_from_rows(&self.alphat, "alphat")?,
            betat: DVector::from_vec(self.betat.clone()),
            alphab0: matrix_from_rows(&self.alphab0, "alphab0")?,
            alphab1: matrix_from_rows(&self.alphab1, "alphab1")?,
            betab: DVector::from_vec(self.betab.clone()),
            weights: self
                .weights
                .iter()
                .map(|c| matrix_from_rows(c, "weights"))
                .collect::<OperatorResult<Vec<_>>>()?,
            param0: self.param0,
            dparam: self.dparam,
        };
        let config = EvalConfig {
            normalize_blend: self.flag_norm,
            n_out: self.n_out,
        };
        RandONet::new(params, config)
    }
}

/// A batch of evaluations against one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalRequest {
    /// One sampled input function per entry.
    pub input: Vec<Vec<f64>>,
    /// One shared value, or one per input function.
    pub param: Vec<f64>,
    /// One coordinate tuple per output location.
    pub query: Vec<Vec<f64>>,
}

impl EvalRequest {
    /// Input functions as an `nx × ns` matrix (one column per sample).
    pub fn input_matrix(&self) -> OperatorResult<DMatrix<f64>> {
        Ok(matrix_from_rows(&self.input, "input")?.transpose())
    }

    /// Query locations as an `Ny × d` matrix.
    pub fn query_matrix(&self) -> OperatorResult<DMatrix<f64>> {
        matrix_from_rows(&self.query, "query")
    }

    pub fn evaluate(&self, net: &RandONet) -> OperatorResult<DMatrix<f64>> {
        net.evaluate(&self.input_matrix()?, &self.param, &self.query_matrix()?)
    }
}

pub(crate) fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> OperatorResult<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(OperatorError::DimensionMismatch {
            what: format!(
                "{what}: row {i} has {} entries, expected {ncols}",
                row.len()
            ),
        });
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_become_matrix() {
        let m = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]], "m").unwrap();
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]], "alphat").unwrap_err();
        assert!(err.to_string().contains("alphat: row 1"));
    }

    #[test]
    fn request_input_is_column_per_sample() {
        let req = EvalRequest {
            input: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            param: vec![0.0],
            query: vec![vec![0.5]],
        };
        let input = req.input_matrix().unwrap();
        assert_eq!(input.shape(), (3, 2));
        assert_eq!(input[(2, 1)], 6.0);
    }
}
