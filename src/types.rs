use crate::mixture::Mixture;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An interface for the externally trained strength predictor.
///
/// The predictor maps a feature vector (the seven ingredient proportions in
/// [`INGREDIENTS`](crate::INGREDIENTS) order followed by the curing age) to
/// a predicted compressive strength. It is treated as an opaque capability:
/// deterministic for a given input, stateless across calls and safe to
/// invoke concurrently from several optimization runs.
pub trait Predictor: Sync {
    /// Predict the compressive strength for the given feature vector
    fn predict(&self, features: &ArrayView1<f64>) -> f64;
}

/// Any `Sync` closure over a feature vector view is a valid predictor,
/// which makes stub models trivial to inject in tests and demos.
impl<F> Predictor for F
where
    F: Fn(&ArrayView1<f64>) -> f64 + Sync,
{
    fn predict(&self, features: &ArrayView1<f64>) -> f64 {
        (self)(features)
    }
}

/// Outcome of one optimization run, ready for ranking
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankedMixture {
    /// Full mixture reconstructed at the run's best point
    pub mixture: Mixture,
    /// Predicted compressive strength at that mixture
    pub predicted_strength: f64,
    /// False when the run never escaped the infeasible region; such
    /// results rank last but are kept rather than discarded
    pub feasible: bool,
    /// Index of the starting point that produced this result
    pub start_index: usize,
}

impl fmt::Display for RankedMixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.feasible {
            write!(
                f,
                "{} {:>10.3} (start #{})",
                self.mixture, self.predicted_strength, self.start_index
            )
        } else {
            write!(f, "{} {:>10} (start #{})", self.mixture, "infeasible", self.start_index)
        }
    }
}
