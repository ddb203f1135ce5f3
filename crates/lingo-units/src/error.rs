use thiserror::Error;

/// Failure to read a value typed with an SI prefix.
#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    /// Nothing left after removing the suffix.
    #[error("empty value")]
    Empty,

    /// The numeric part is not a number.
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}
