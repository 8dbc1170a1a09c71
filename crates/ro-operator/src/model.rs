//! Fitted RandONet parameters.

use crate::activation::Activation;
use crate::error::{OperatorError, OperatorResult};
use nalgebra::{DMatrix, DVector};
use ro_core::ensure_nonzero;

/// Evaluation flags with their documented defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Divide the homotopy blend weights by `sqrt(p² + (1-p)²)`.
    pub normalize_blend: bool,
    /// Number of output channels (one weight matrix each).
    pub n_out: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            normalize_blend: false,
            n_out: 1,
        }
    }
}

/// Raw parameter set, as produced by an external fitting process.
///
/// Shapes: `alphat` is `d × M`, `betat` has length `M`, `alphab0`/`alphab1`
/// are `Nb × (nx+1)`, `betab` has length `Nb`, every weight matrix is `M × Nb`.
#[derive(Clone, Debug)]
pub struct RandONetParams {
    pub trunk: Activation,
    pub branch: Activation,
    pub alphat: DMatrix<f64>,
    pub betat: DVector<f64>,
    pub alphab0: DMatrix<f64>,
    pub alphab1: DMatrix<f64>,
    pub betab: DVector<f64>,
    pub weights: Vec<DMatrix<f64>>,
    pub param0: f64,
    pub dparam: f64,
}

/// A validated, immutable RandONet.
#[derive(Clone, Debug)]
pub struct RandONet {
    pub(crate) trunk: Activation,
    pub(crate) branch: Activation,
    pub(crate) alphat: DMatrix<f64>,
    pub(crate) betat: DVector<f64>,
    pub(crate) alphab0: DMatrix<f64>,
    pub(crate) alphab1: DMatrix<f64>,
    pub(crate) betab: DVector<f64>,
    pub(crate) weights: Vec<DMatrix<f64>>,
    pub(crate) param0: f64,
    pub(crate) dparam: f64,
    pub(crate) config: EvalConfig,
}

impl RandONet {
    /// Validate parameters against each other and against `config`.
    pub fn new(params: RandONetParams, config: EvalConfig) -> OperatorResult<Self> {
        let trunk = params.trunk.check_trunk()?;
        let branch = params.branch.check_branch()?;

        let n_trunk = params.alphat.ncols();
        if params.betat.len() != n_trunk {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "betat has length {} but alphat has {} columns",
                    params.betat.len(),
                    n_trunk
                ),
            });
        }

        if params.alphab0.shape() != params.alphab1.shape() {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "alphab0 is {:?} but alphab1 is {:?}",
                    params.alphab0.shape(),
                    params.alphab1.shape()
                ),
            });
        }
        if params.alphab0.ncols() == 0 {
            return Err(OperatorError::DimensionMismatch {
                what: "branch coefficients need at least the parameter column".to_string(),
            });
        }

        let n_branch = params.alphab0.nrows();
        if params.betab.len() != n_branch {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "betab has length {} but alphab0 has {} rows",
                    params.betab.len(),
                    n_branch
                ),
            });
        }

        if config.n_out == 0 {
            return Err(OperatorError::InvalidArg {
                what: "n_out must be at least 1",
            });
        }
        if params.weights.len() != config.n_out {
            return Err(OperatorError::DimensionMismatch {
                what: format!(
                    "n_out = {} but {} weight matrices were given",
                    config.n_out,
                    params.weights.len()
                ),
            });
        }
        for (j, c) in params.weights.iter().enumerate() {
            if c.shape() != (n_trunk, n_branch) {
                return Err(OperatorError::DimensionMismatch {
                    what: format!(
                        "weight matrix {} is {:?}, expected {:?}",
                        j,
                        c.shape(),
                        (n_trunk, n_branch)
                    ),
                });
            }
        }

        let param0 = ro_core::ensure_finite(params.param0, "param0")?;
        let dparam = ensure_nonzero(params.dparam, "dparam")?;

        Ok(Self {
            trunk,
            branch,
            alphat: params.alphat,
            betat: params.betat,
            alphab0: params.alphab0,
            alphab1: params.alphab1,
            betab: params.betab,
            weights: params.weights,
            param0,
            dparam,
            config,
        })
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn trunk_activation(&self) -> Activation {
        self.trunk
    }

    pub fn branch_activation(&self) -> Activation {
        self.branch
    }

    /// Dimension of a query location (`d`).
    pub fn location_dim(&self) -> usize {
        self.alphat.nrows()
    }

    /// Number of grid samples per input function (`nx`), excluding the appended parameter.
    pub fn input_len(&self) -> usize {
        self.alphab0.ncols() - 1
    }

    /// Number of trunk features (`M`).
    pub fn trunk_width(&self) -> usize {
        self.alphat.ncols()
    }

    /// Number of branch features (`Nb`).
    pub fn branch_width(&self) -> usize {
        self.alphab0.nrows()
    }

    pub fn n_out(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[DMatrix<f64>] {
        &self.weights
    }

    /// Map a raw homotopy value into blend coordinates.
    pub fn rescale_param(&self, param: f64) -> f64 {
        (param - self.param0) / self.dparam
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RandONetParams {
        RandONetParams {
            trunk: Activation::Tanh,
            branch: Activation::Identity,
            alphat: DMatrix::from_row_slice(1, 2, &[1.0, 2.0]),
            betat: DVector::from_vec(vec![0.0, 0.5]),
            alphab0: DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            alphab1: DMatrix::from_row_slice(2, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0]),
            betab: DVector::from_vec(vec![0.1, 0.2]),
            weights: vec![DMatrix::identity(2, 2)],
            param0: 0.0,
            dparam: 1.0,
        }
    }

    #[test]
    fn valid_params_build() {
        let net = RandONet::new(params(), EvalConfig::default()).unwrap();
        assert_eq!(net.location_dim(), 1);
        assert_eq!(net.input_len(), 2);
        assert_eq!(net.trunk_width(), 2);
        assert_eq!(net.branch_width(), 2);
        assert_eq!(net.n_out(), 1);
    }

    #[test]
    fn channel_count_must_match() {
        let cfg = EvalConfig {
            n_out: 2,
            ..EvalConfig::default()
        };
        let err = RandONet::new(params(), cfg).unwrap_err();
        assert!(matches!(err, OperatorError::DimensionMismatch { .. }));
    }

    #[test]
    fn weight_shape_is_checked() {
        let mut p = params();
        p.weights = vec![DMatrix::zeros(3, 2)];
        let err = RandONet::new(p, EvalConfig::default()).unwrap_err();
        assert!(err.to_string().contains("weight matrix 0"));
    }

    #[test]
    fn endpoint_coefficients_must_agree() {
        let mut p = params();
        p.alphab1 = DMatrix::zeros(2, 2);
        assert!(RandONet::new(p, EvalConfig::default()).is_err());
    }

    #[test]
    fn zero_dparam_rejected() {
        let mut p = params();
        p.dparam = 0.0;
        let err = RandONet::new(p, EvalConfig::default()).unwrap_err();
        assert!(matches!(err, OperatorError::Core(_)));
    }

    #[test]
    fn unsupported_activations_rejected() {
        let mut p = params();
        p.trunk = Activation::Cosine;
        assert!(matches!(
            RandONet::new(p, EvalConfig::default()).unwrap_err(),
            OperatorError::UnsupportedConfiguration { role: "trunk", .. }
        ));

        let mut p = params();
        p.branch = Activation::Tanh;
        assert!(matches!(
            RandONet::new(p, EvalConfig::default()).unwrap_err(),
            OperatorError::UnsupportedConfiguration { role: "branch", .. }
        ));
    }

    #[test]
    fn rescale_uses_reference_and_scale() {
        let mut p = params();
        p.param0 = 2.0;
        p.dparam = 4.0;
        let net = RandONet::new(p, EvalConfig::default()).unwrap();
        assert_eq!(net.rescale_param(2.0), 0.0);
        assert_eq!(net.rescale_param(6.0), 1.0);
    }
}
