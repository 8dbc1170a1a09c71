//! Stepping loop: propagate, then re-impose boundary values.

use crate::correction::SeamLayout;
use crate::error::{BoxError, StepperError, StepperResult};
use nalgebra::DVector;

/// Applies a propagator repeatedly, correcting segment boundaries after each step.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryCorrectedStepper {
    layout: SeamLayout,
}

impl BoundaryCorrectedStepper {
    pub fn new(layout: SeamLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> SeamLayout {
        self.layout
    }

    /// Advance `initial` so that it becomes step `num_steps`; the initial
    /// state itself is step 1. Only the final state is returned.
    pub fn run<F, E>(
        &self,
        mut step_fn: F,
        initial: &DVector<f64>,
        num_steps: usize,
    ) -> StepperResult<DVector<f64>>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
        E: Into<BoxError>,
    {
        if num_steps == 0 {
            return Err(StepperError::InvalidArg {
                what: "num_steps must be at least 1",
            });
        }
        if initial.len() != self.layout.len() {
            return Err(StepperError::DimensionMismatch {
                what: format!(
                    "initial state has length {}, layout expects {}",
                    initial.len(),
                    self.layout.len()
                ),
            });
        }

        let mut state = initial.clone();
        for step in 2..=num_steps {
            let mut next = step_fn(&state).map_err(|e| StepperError::PropagatorFailure {
                step,
                source: e.into(),
            })?;
            if next.len() != state.len() {
                return Err(StepperError::DimensionMismatch {
                    what: format!(
                        "propagator returned length {} at step {}, expected {}",
                        next.len(),
                        step,
                        state.len()
                    ),
                });
            }
            self.layout.correct(&mut next)?;
            state = next;
        }

        tracing::debug!(
            num_steps,
            segments = self.layout.segments(),
            "boundary-corrected run finished"
        );
        Ok(state)
    }
}

/// Run with the state split into two half-domains (edges plus the midpoint seam).
pub fn run<F, E>(step_fn: F, initial: &DVector<f64>, num_steps: usize) -> StepperResult<DVector<f64>>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    E: Into<BoxError>,
{
    run_segments(step_fn, initial, num_steps, 2)
}

/// Run with the state split into `segments` equal sub-domains.
pub fn run_segments<F, E>(
    step_fn: F,
    initial: &DVector<f64>,
    num_steps: usize,
    segments: usize,
) -> StepperResult<DVector<f64>>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    E: Into<BoxError>,
{
    let layout = SeamLayout::new(initial.len(), segments)?;
    BoundaryCorrectedStepper::new(layout).run(step_fn, initial, num_steps)
}
