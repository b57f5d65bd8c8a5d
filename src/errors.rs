use thiserror::Error;

/// A result type for mixture optimization errors
pub type Result<T> = std::result::Result<T, MixtureError>;

/// An error for the mixture strength optimizer
#[derive(Error, Debug)]
pub enum MixtureError {
    /// When an invalid value is encountered
    #[error("Value error: {0}")]
    InvalidValue(String),
}
