//! Derivative-free optimizers used by the multistart driver

mod nelder_mead;

pub use nelder_mead::{minimize, NelderMeadOptions, NelderMeadResult};
