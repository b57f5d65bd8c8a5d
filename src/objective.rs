//! Penalty-constrained objective around the strength predictor.
//!
//! The search minimizes, so a candidate's value is the negated predicted
//! strength. Infeasible candidates get a large finite sentinel instead of a
//! hard constraint: derivative-free simplex methods handle "very bad" values
//! gracefully where they cannot handle constraint boundaries.

use crate::mixture::{Mixture, N_FREE, WATER};
use crate::types::Predictor;

/// Sentinel value returned for infeasible candidate points.
///
/// Large enough that any feasible negated strength (roughly in `[-100, 0]`
/// for realistic concrete) always wins a comparison against it, and finite
/// so simplex arithmetic stays well defined.
pub const INFEASIBLE_PENALTY: f64 = 1e38;

/// Default minimum water proportion of a physically realizable mixture
pub const DEFAULT_MIN_WATER: f64 = 0.05;

/// Default curing age in days (the study targets 28-day strength)
pub const DEFAULT_AGE: f64 = 28.0;

/// Minimization objective mapping a candidate point (the [`N_FREE`] free
/// proportions) to the negated predicted strength, or to
/// [`INFEASIBLE_PENALTY`] when the point is out of range or implies
/// negligible water content.
///
/// Evaluation is a pure function of the candidate point and the fixed
/// `age`/`min_water` parameters: the same point always yields the same
/// value, which keeps the simplex search deterministic.
pub struct MixtureObjective<'a, P: Predictor> {
    predictor: &'a P,
    age: f64,
    min_water: f64,
}

impl<'a, P: Predictor> MixtureObjective<'a, P> {
    /// Wrap a predictor with the default 28-day age and water guard
    pub fn new(predictor: &'a P) -> Self {
        MixtureObjective {
            predictor,
            age: DEFAULT_AGE,
            min_water: DEFAULT_MIN_WATER,
        }
    }

    /// Set the curing age appended to every feature vector
    pub fn age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    /// Set the minimum realizable water proportion
    pub fn min_water(mut self, min_water: f64) -> Self {
        self.min_water = min_water;
        self
    }

    /// Evaluate a candidate point.
    ///
    /// Feasibility checks short-circuit before the predictor is touched:
    /// every free proportion must lie in `[0, 1]` and the water proportion
    /// must reach `min_water`. The derived fine aggregate proportion is
    /// deliberately not re-validated into `[0, 1]` (behavior inherited from
    /// the study, see DESIGN.md).
    ///
    /// Panics if `x` does not have exactly [`N_FREE`] components; the
    /// caller owns the candidate shape end to end, so a mismatch is a
    /// contract bug rather than a data issue.
    pub fn eval(&self, x: &[f64]) -> f64 {
        assert_eq!(
            x.len(),
            N_FREE,
            "candidate point must have {} components",
            N_FREE
        );
        if x.iter().any(|&v| !(0. ..=1.).contains(&v)) {
            return INFEASIBLE_PENALTY;
        }
        let mixture = Mixture::from_free(x, self.age);
        if mixture.proportions[WATER] < self.min_water {
            return INFEASIBLE_PENALTY;
        }
        -self.predictor.predict(&mixture.feature_vector().view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::ArrayView1;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Probe predictor counting its invocations
    fn counting_predictor(counter: &AtomicUsize) -> impl Fn(&ArrayView1<f64>) -> f64 + Sync + '_ {
        move |features: &ArrayView1<f64>| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(features.len(), 8);
            10. * features[0] + features[7] / 28.
        }
    }

    #[test]
    fn test_out_of_range_component_hits_penalty() {
        let calls = AtomicUsize::new(0);
        let predictor = counting_predictor(&calls);
        let objective = MixtureObjective::new(&predictor);
        assert_eq!(objective.eval(&[1.5, 0., 0., 0., 0., 0.]), INFEASIBLE_PENALTY);
        assert_eq!(objective.eval(&[0.3, -0.1, 0.05, 0.2, 0.02, 0.2]), INFEASIBLE_PENALTY);
        // Predictor never invoked on infeasible points
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_low_water_hits_penalty() {
        let calls = AtomicUsize::new(0);
        let predictor = counting_predictor(&calls);
        let objective = MixtureObjective::new(&predictor);
        assert_eq!(objective.eval(&[0.3, 0.1, 0.05, 0.03, 0.02, 0.2]), INFEASIBLE_PENALTY);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_feasible_point_negates_prediction() {
        let calls = AtomicUsize::new(0);
        let predictor = counting_predictor(&calls);
        let objective = MixtureObjective::new(&predictor);
        let value = objective.eval(&[0.3, 0.1, 0.05, 0.2, 0.02, 0.2]);
        // predictor sees [0.3, 0.1, 0.05, 0.2, 0.02, 0.2, 0.13, 28.0]
        assert_abs_diff_eq!(value, -(10. * 0.3 + 1.), epsilon = 1e-12);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let calls = AtomicUsize::new(0);
        let predictor = counting_predictor(&calls);
        let objective = MixtureObjective::new(&predictor);
        let x = [0.25, 0.12, 0.03, 0.18, 0.01, 0.22];
        assert_eq!(objective.eval(&x), objective.eval(&x));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_age_and_water_threshold() {
        let predictor =
            |features: &ArrayView1<f64>| features[7];
        let objective = MixtureObjective::new(&predictor).age(90.).min_water(0.1);
        assert_abs_diff_eq!(
            objective.eval(&[0.3, 0.1, 0.05, 0.2, 0.02, 0.2]),
            -90.,
            epsilon = 1e-12
        );
        assert_eq!(
            objective.eval(&[0.3, 0.1, 0.05, 0.08, 0.02, 0.2]),
            INFEASIBLE_PENALTY
        );
    }

    #[test]
    #[should_panic]
    fn test_wrong_arity_panics() {
        let predictor = |_: &ArrayView1<f64>| 0.;
        let objective = MixtureObjective::new(&predictor);
        let _ = objective.eval(&[0.3, 0.1]);
    }
}
