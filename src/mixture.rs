//! Concrete mixture data model.
//!
//! A mixture is an ordered set of ingredient proportions summing to one.
//! The last ingredient (fine aggregate) is never an independent decision
//! variable: it is derived as the sum-to-one complement of the others, which
//! enforces the normalization constraint structurally.

use ndarray::{s, Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ingredient names in the fixed column order used throughout the crate
pub const INGREDIENTS: [&str; 7] = [
    "cement",
    "blast_furnace_slag",
    "fly_ash",
    "water",
    "superplasticizer",
    "coarse_aggregate",
    "fine_aggregate",
];

/// Number of mixture ingredients
pub const N_INGREDIENTS: usize = INGREDIENTS.len();

/// Number of free decision variables (all proportions except the derived
/// fine aggregate)
pub const N_FREE: usize = N_INGREDIENTS - 1;

/// Index of the water proportion
pub const WATER: usize = 3;

/// A complete normalized mixture: the seven ingredient proportions (summing
/// to one by construction) together with the curing age in days.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mixture {
    /// Ingredient proportions in [`INGREDIENTS`] order
    pub proportions: Array1<f64>,
    /// Curing age (days)
    pub age: f64,
}

impl Mixture {
    /// Build a mixture from the `N_FREE` free proportions, deriving the
    /// fine aggregate proportion as `1 - sum(free)`.
    ///
    /// The derived value is not clamped into `[0, 1]`; feasibility of the
    /// free proportions is the caller's concern (see
    /// [`MixtureObjective`](crate::MixtureObjective)).
    pub fn from_free(free: &[f64], age: f64) -> Mixture {
        assert_eq!(
            free.len(),
            N_FREE,
            "candidate point must have {} components",
            N_FREE
        );
        let mut proportions = Array1::zeros(N_INGREDIENTS);
        proportions
            .slice_mut(s![..N_FREE])
            .assign(&ArrayView1::from(free));
        proportions[N_FREE] = 1. - free.iter().sum::<f64>();
        Mixture { proportions, age }
    }

    /// Feature vector in the predictor's input order: the seven ingredient
    /// proportions followed by the curing age. Built fresh on each call.
    pub fn feature_vector(&self) -> Array1<f64> {
        let mut features = Array1::zeros(N_INGREDIENTS + 1);
        features
            .slice_mut(s![..N_INGREDIENTS])
            .assign(&self.proportions);
        features[N_INGREDIENTS] = self.age;
        features
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.proportions.iter() {
            write!(f, "{p:>8.4} ")?;
        }
        write!(f, "{:>5.1}", self.age)
    }
}
