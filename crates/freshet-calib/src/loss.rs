//! Loss evaluation: one model run per candidate, scored against
//! observations.

use tracing::warn;

use freshet_model::{Launcher, RunnableModel};
use freshet_settings::Overrides;

use crate::measures::Measure;

/// Turns an optimizer's candidate vector into settings overrides.
///
/// This is where calibration-specific knowledge lives: which keywords the
/// candidate components map to, and on what scale.
pub trait Massage {
    /// Overrides for one candidate.
    fn massage(&self, candidate: &[f64]) -> Overrides;
}

impl<F> Massage for F
where
    F: Fn(&[f64]) -> Overrides,
{
    fn massage(&self, candidate: &[f64]) -> Overrides {
        self(candidate)
    }
}

/// A loss function around repeated model invocations.
///
/// Each evaluation massages the candidate into overrides, runs the model
/// in a throwaway directory and scores the simulated series. A failed run
/// (binary missing, crash, unusable outputs) evaluates to NaN so sweep and
/// optimizer layers can skip the candidate instead of aborting.
pub struct Loss<M, P, S> {
    launcher: Launcher,
    model: M,
    massage: P,
    measure: S,
}

impl<M, P, S> Loss<M, P, S>
where
    M: RunnableModel<Output = Vec<f64>>,
    P: Massage,
    S: Measure,
{
    /// Assemble a loss from its collaborators.
    pub fn new(launcher: Launcher, model: M, massage: P, measure: S) -> Self {
        Self {
            launcher,
            model,
            massage,
            measure,
        }
    }

    /// Evaluate one candidate.
    pub fn evaluate(&self, candidate: &[f64]) -> f64 {
        let overrides = self.massage.massage(candidate);
        match self.launcher.run(&self.model, &overrides) {
            Ok(simulation) => self.measure.score(&simulation),
            Err(err) => {
                warn!("model evaluation failed: {err}");
                f64::NAN
            }
        }
    }
}
