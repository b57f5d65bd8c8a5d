//! Multi-start search driver.
//!
//! A single Nelder-Mead run only finds a local optimum of the predicted
//! strength surface, and not every starting value leads to a solution at
//! all. Running one independent minimization per observed mixture and
//! ranking all outcomes best-first mitigates both: good local optima
//! surface at the top, stuck runs sink to the bottom without being treated
//! as errors.

use crate::errors::{MixtureError, Result};
use crate::mixture::{Mixture, N_FREE};
use crate::objective::{MixtureObjective, DEFAULT_AGE, DEFAULT_MIN_WATER, INFEASIBLE_PENALTY};
use crate::optimizers::{self, NelderMeadOptions};
use crate::types::{Predictor, RankedMixture};

use log::{debug, info};
use ndarray::Array2;
use rayon::prelude::*;

/// Multi-start driver around a strength predictor.
///
/// Holds an ordered collection of starting candidate points (one row per
/// observed mixture, [`N_FREE`] columns, pre-filtered to the curing age of
/// interest) and runs one independent bounded Nelder-Mead minimization per
/// row. Runs share no state, so they are mapped in parallel.
pub struct MultiStart<'a, P: Predictor> {
    predictor: &'a P,
    starts: Array2<f64>,
    age: f64,
    min_water: f64,
    options: NelderMeadOptions,
}

impl<'a, P: Predictor> MultiStart<'a, P> {
    /// Set up a driver over the given starting candidate points
    pub fn new(predictor: &'a P, starts: &Array2<f64>) -> Self {
        MultiStart {
            predictor,
            starts: starts.to_owned(),
            age: DEFAULT_AGE,
            min_water: DEFAULT_MIN_WATER,
            options: NelderMeadOptions::default(),
        }
    }

    /// Set the curing age (days) fixed across the whole search
    pub fn age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    /// Set the minimum realizable water proportion
    pub fn min_water(mut self, min_water: f64) -> Self {
        self.min_water = min_water;
        self
    }

    /// Set the per-run iteration budget (default 5000)
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.options.max_iters = max_iters;
        self
    }

    /// Set the absolute tolerance on objective values (default 1e-4)
    pub fn fatol(mut self, fatol: f64) -> Self {
        self.options.fatol = fatol;
        self
    }

    /// Set the absolute tolerance on vertex coordinates (default 1e-4)
    pub fn xatol(mut self, xatol: f64) -> Self {
        self.options.xatol = xatol;
        self
    }

    /// Run every start to completion and rank the outcomes.
    ///
    /// Returns a freshly built collection sorted by predicted strength
    /// descending: the first entry is the proposed best mixture. A run
    /// that stays stuck at the penalty sentinel is recorded with
    /// `feasible = false` and sorts last; it never aborts the batch.
    pub fn run(&self) -> Result<Vec<RankedMixture>> {
        if self.starts.ncols() != N_FREE {
            return Err(MixtureError::InvalidValue(format!(
                "starting points must have {} columns, got {}",
                N_FREE,
                self.starts.ncols()
            )));
        }

        let objective = MixtureObjective::new(self.predictor)
            .age(self.age)
            .min_water(self.min_water);

        let mut results: Vec<RankedMixture> = (0..self.starts.nrows())
            .into_par_iter()
            .map(|i| {
                let x0 = self.starts.row(i).to_owned();
                let res = optimizers::minimize(|x| objective.eval(x), &x0, &self.options);
                debug!(
                    "start #{}: f={:.6e} iters={} converged={}",
                    i, res.fval, res.n_iters, res.converged
                );
                let feasible = res.fval < INFEASIBLE_PENALTY;
                RankedMixture {
                    mixture: Mixture::from_free(&res.x.to_vec(), self.age),
                    predicted_strength: -res.fval,
                    feasible,
                    start_index: i,
                }
            })
            .collect();

        results.sort_by(|a, b| b.predicted_strength.total_cmp(&a.predicted_strength));
        if let Some(best) = results.first() {
            info!(
                "multistart: {} runs, best predicted strength {:.3}",
                results.len(),
                best.predicted_strength
            );
        }
        Ok(results)
    }
}

/// Render the `top` first ranked results as a table, best first
pub fn report(results: &[RankedMixture], top: usize) -> String {
    use crate::mixture::INGREDIENTS;
    use std::fmt::Write;

    let mut out = String::new();
    write!(out, "{:>4} ", "rank").unwrap();
    for name in INGREDIENTS {
        // Shorten long ingredient names to the column width
        write!(out, "{:>8} ", &name[..name.len().min(8)]).unwrap();
    }
    writeln!(out, "{:>5} {:>10}", "age", "strength").unwrap();
    for (rank, result) in results.iter().take(top).enumerate() {
        writeln!(out, "{:>4} {}", rank + 1, result).unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2, ArrayView1};

    // Smooth stand-in model with a single interior optimum: rewards cement
    // around 0.35 and water around 0.15
    fn peak_predictor(features: &ArrayView1<f64>) -> f64 {
        60. - 200. * (features[0] - 0.35).powi(2) - 300. * (features[3] - 0.15).powi(2)
    }

    fn observed_starts(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, N_FREE), |(i, j)| {
            let base = [0.25, 0.08, 0.04, 0.18, 0.01, 0.28][j];
            base + 0.002 * ((i * (j + 3)) % 11) as f64
        })
    }

    #[test]
    fn test_one_result_per_start_sorted_descending() {
        let starts = observed_starts(115);
        let results = MultiStart::new(&peak_predictor, &starts)
            .max_iters(500)
            .run()
            .unwrap();
        assert_eq!(results.len(), 115);
        for pair in results.windows(2) {
            assert!(pair[0].predicted_strength >= pair[1].predicted_strength);
        }
        let best = &results[0];
        assert!(results
            .iter()
            .all(|r| best.predicted_strength >= r.predicted_strength));
    }

    #[test]
    fn test_finds_the_peak() {
        let starts = observed_starts(8);
        let results = MultiStart::new(&peak_predictor, &starts).run().unwrap();
        let best = &results[0];
        assert!(best.feasible);
        assert_abs_diff_eq!(best.predicted_strength, 60., epsilon = 1e-2);
        assert_abs_diff_eq!(best.mixture.proportions[0], 0.35, epsilon = 1e-2);
        assert_abs_diff_eq!(best.mixture.proportions[3], 0.15, epsilon = 1e-2);
        // Full mixture reconstructed with derived fine aggregate
        assert_abs_diff_eq!(best.mixture.proportions.sum(), 1., epsilon = 1e-9);
        assert_abs_diff_eq!(best.mixture.age, 28., epsilon = 1e-12);
    }

    #[test]
    fn test_stuck_runs_rank_last() {
        // Second start is infeasible (negative component) and far enough
        // out that the initial simplex stays infeasible
        let starts = array![[0.25, 0.08, 0.04, 0.18, 0.01, 0.28], [-5., -5., -5., -5., -5., -5.]];
        let results = MultiStart::new(&peak_predictor, &starts)
            .max_iters(50)
            .run()
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].feasible);
        assert!(!results[1].feasible);
        assert_eq!(results[1].start_index, 1);
        assert_eq!(results[1].predicted_strength, -INFEASIBLE_PENALTY);
    }

    #[test]
    fn test_rejects_bad_start_width() {
        let starts = array![[0.25, 0.08, 0.04]];
        let err = MultiStart::new(&peak_predictor, &starts).run().unwrap_err();
        assert!(matches!(err, MixtureError::InvalidValue(_)));
    }

    #[test]
    fn test_report_lists_requested_rows() {
        let starts = observed_starts(5);
        let results = MultiStart::new(&peak_predictor, &starts)
            .max_iters(100)
            .run()
            .unwrap();
        let table = report(&results, 3);
        assert_eq!(table.lines().count(), 4);
        assert!(table.starts_with("rank") || table.trim_start().starts_with("rank"));
        assert!(table.contains("cement"));
        assert!(table.contains("water"));
    }
}
