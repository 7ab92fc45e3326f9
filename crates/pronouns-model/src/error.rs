use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown color: {0}")]
    UnknownColor(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Rejection of a user request.
///
/// Reported back to the requester; a request that fails validation leaves the store untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pronouns too long: {actual} characters, maximum {limit}")]
    TooLong { limit: usize, actual: usize },

    #[error("pronouns must not be empty")]
    EmptyText,

    #[error("unknown color: {0}")]
    UnknownColor(String),

    #[error("unknown gradient preset: {0}")]
    UnknownPreset(String),

    #[error("gradient requires at least {min} colors, got {actual}")]
    TooFewStops { min: usize, actual: usize },

    #[error("too many gradient colors: {actual}, maximum {limit}")]
    TooManyStops { limit: usize, actual: usize },

    #[error("no pronouns set")]
    NotSet,

    #[error("not permitted to change another player's pronouns")]
    Forbidden,
}

