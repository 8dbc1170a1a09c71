use crate::CoreError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute/relative tolerance pair
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Element-wise `nearly_equal` over two slices of equal length.
pub fn all_nearly_equal(a: &[Real], b: &[Real], tol: Tolerances) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| nearly_equal(x, y, tol))
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and non-zero; used for divisors.
pub fn ensure_nonzero(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v == 0.0 {
        return Err(CoreError::InvalidArg { what });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn all_nearly_equal_checks_length() {
        let tol = Tolerances::default();
        assert!(all_nearly_equal(&[1.0, 2.0], &[1.0, 2.0], tol));
        assert!(!all_nearly_equal(&[1.0, 2.0], &[1.0], tol));
        assert!(!all_nearly_equal(&[1.0, 2.0], &[1.0, 2.1], tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_nonzero_rejects_zero() {
        assert!(ensure_nonzero(0.0, "dparam").is_err());
        assert!(ensure_nonzero(Real::INFINITY, "dparam").is_err());
        assert_eq!(ensure_nonzero(-2.0, "dparam").unwrap(), -2.0);
    }
}
