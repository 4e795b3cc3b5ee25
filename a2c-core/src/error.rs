//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// An environment with the same id has already been registered.
    #[error("Environment {0} is already registered")]
    EnvAlreadyRegistered(String),

    /// No environment is registered with the id.
    #[error("No environment is registered with id {0}")]
    EnvNotRegistered(String),
}
