//! This library implements the mixture-optimization step of a concrete
//! compressive strength study: given an externally trained strength
//! predictor, it searches for ingredient proportions that maximize the
//! predicted strength at a fixed curing age.
//!
//! The search works on a reduced candidate point (six of the seven
//! proportions; fine aggregate is derived to keep the mixture normalized),
//! wraps the predictor in a penalty-constrained objective and minimizes the
//! negated strength with a budget-bounded Nelder-Mead simplex, restarted
//! independently from every observed mixture. All outcomes are ranked
//! best-first; runs stuck in the infeasible region rank last instead of
//! failing the batch.
//!
//! The predictor itself is an injected capability (see [`Predictor`]): any
//! deterministic function over a feature vector qualifies, from a stub
//! closure to a trained tree ensemble served from elsewhere.
//!
//! # Example
//!
//! ```
//! use betobox::MultiStart;
//! use ndarray::{array, ArrayView1};
//!
//! // A stand-in for the trained regression model: input is the seven
//! // ingredient proportions followed by the curing age
//! fn strength(features: &ArrayView1<f64>) -> f64 {
//!     100. * features[0] - 200. * (features[3] - 0.16).powi(2)
//! }
//!
//! // Observed 28-day mixtures, free proportions only
//! let starts = array![
//!     [0.25, 0.08, 0.04, 0.18, 0.01, 0.28],
//!     [0.30, 0.05, 0.02, 0.16, 0.02, 0.25],
//! ];
//!
//! let results = MultiStart::new(&strength, &starts)
//!     .max_iters(1000)
//!     .run()
//!     .expect("valid starting points");
//! println!("best proposed mixture: {}", results[0]);
//! ```

mod errors;
mod mixture;
mod multistart;
mod objective;
pub mod optimizers;
mod types;

pub use crate::errors::{MixtureError, Result};
pub use crate::mixture::{Mixture, INGREDIENTS, N_FREE, N_INGREDIENTS, WATER};
pub use crate::multistart::{report, MultiStart};
pub use crate::objective::{
    MixtureObjective, DEFAULT_AGE, DEFAULT_MIN_WATER, INFEASIBLE_PENALTY,
};
pub use crate::optimizers::{NelderMeadOptions, NelderMeadResult};
pub use crate::types::{Predictor, RankedMixture};
