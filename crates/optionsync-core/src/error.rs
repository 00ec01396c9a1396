//! Error types for optionsync-core

use thiserror::Error;

use crate::models::{OptionKey, WritePolicy};

/// Result type alias using optionsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in optionsync-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A call to the option store did not succeed
    #[error("{0}")]
    RemoteOperationFailed(String),

    /// An operation was applied to a key with a different write policy
    #[error("{key} is not a {expected} option")]
    PolicyMismatch {
        key: OptionKey,
        expected: WritePolicy,
    },
}
