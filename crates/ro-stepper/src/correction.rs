//! Boundary extrapolation at domain edges and internal seams.

use crate::error::{StepperError, StepperResult};
use nalgebra::DVector;

/// Value at a boundary point from its two nearest interior neighbours,
/// enforcing a vanishing one-sided derivative.
#[inline]
pub fn extrapolate(near: f64, far: f64) -> f64 {
    (4.0 * near - far) / 3.0
}

/// A state vector split into equal contiguous segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeamLayout {
    len: usize,
    segments: usize,
}

impl SeamLayout {
    pub fn new(len: usize, segments: usize) -> StepperResult<Self> {
        if segments == 0 {
            return Err(StepperError::InvalidArg {
                what: "segment count must be positive",
            });
        }
        if len % segments != 0 {
            return Err(StepperError::InvalidArg {
                what: "state length must divide evenly into segments",
            });
        }
        if len / segments < 3 {
            return Err(StepperError::InvalidArg {
                what: "each segment needs at least three points",
            });
        }
        Ok(Self { len, segments })
    }

    /// Two coupled half-domains with a seam at the midpoint.
    pub fn halves(len: usize) -> StepperResult<Self> {
        Self::new(len, 2)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn segment_len(&self) -> usize {
        self.len / self.segments
    }

    /// Zero-based indices of the first and last entry of every segment.
    pub fn boundary_indices(&self) -> Vec<(usize, usize)> {
        let l = self.segment_len();
        (0..self.segments).map(|s| (s * l, s * l + l - 1)).collect()
    }

    /// Overwrite segment end points in place.
    ///
    /// Every new value is computed from `u` as passed in, before any entry is
    /// overwritten.
    pub fn correct(&self, u: &mut DVector<f64>) -> StepperResult<()> {
        if u.len() != self.len {
            return Err(StepperError::DimensionMismatch {
                what: format!("state has length {}, layout expects {}", u.len(), self.len),
            });
        }
        let updates: Vec<(usize, f64)> = self
            .boundary_indices()
            .into_iter()
            .flat_map(|(first, last)| {
                [
                    (first, extrapolate(u[first + 1], u[first + 2])),
                    (last, extrapolate(u[last - 1], u[last - 2])),
                ]
            })
            .collect();
        for (i, v) in updates {
            u[i] = v;
        }
        Ok(())
    }
}

/// Correct `u` split into `segments` equal sub-domains.
pub fn correct_boundaries(u: &mut DVector<f64>, segments: usize) -> StepperResult<()> {
    SeamLayout::new(u.len(), segments)?.correct(u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrapolation_is_exact_for_quadratic_with_zero_slope() {
        // u(x) = x^2 sampled at 0, 1, 2 has zero slope at 0
        assert_eq!(extrapolate(1.0, 4.0), 0.0);
        assert_eq!(extrapolate(2.0, 2.0), 2.0);
    }

    #[test]
    fn layout_rejects_bad_splits() {
        assert!(SeamLayout::halves(7).is_err());
        assert!(SeamLayout::halves(4).is_err());
        assert!(SeamLayout::new(9, 0).is_err());
        assert!(SeamLayout::halves(6).is_ok());
        assert_eq!(SeamLayout::new(12, 3).unwrap().segment_len(), 4);
    }

    #[test]
    fn boundary_indices_for_halves() {
        let layout = SeamLayout::halves(8).unwrap();
        assert_eq!(layout.boundary_indices(), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn interior_entries_untouched() {
        let mut u = DVector::from_vec(vec![9.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 9.0]);
        correct_boundaries(&mut u, 2).unwrap();
        assert_eq!(u[1], 1.0);
        assert_eq!(u[2], 2.0);
        assert_eq!(u[5], 5.0);
        assert_eq!(u[6], 6.0);
        assert_eq!(u[0], extrapolate(1.0, 2.0));
        assert_eq!(u[3], extrapolate(2.0, 1.0));
        assert_eq!(u[4], extrapolate(5.0, 6.0));
        assert_eq!(u[7], extrapolate(6.0, 5.0));
    }

    #[test]
    fn correct_checks_length() {
        let layout = SeamLayout::halves(6).unwrap();
        let mut u = DVector::zeros(8);
        assert!(layout.correct(&mut u).is_err());
    }
}
