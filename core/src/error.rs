//! Error taxonomy for the booking core.

use thiserror::Error;

/// Errors surfaced by storage and collaborator implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying storage call failed transiently.
    ///
    /// Retrying is the transport layer's decision; the core never retries
    /// internally.
    #[error("storage error: {0}")]
    Database(String),

    /// A persisted record could not be decoded into its domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Errors surfaced by the booking service operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced package or booking does not exist
    #[error("{resource} {id} not found")]
    NotFound {
        /// Resource kind, e.g. `"package"` or `"booking"`
        resource: &'static str,
        /// The identifier that failed to resolve
        id: String,
    },

    /// The requester does not own the targeted resource
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request itself is malformed (zero party size, offer price not
    /// below base price, deletion disallowed by policy, ...)
    #[error("invalid request: {0}")]
    Invalid(String),

    /// A storage or catalog call failed; the operation may be retried by
    /// the caller
    #[error("service unavailable")]
    Unavailable(#[from] StoreError),
}

impl CoreError {
    /// Convenience constructor for [`CoreError::NotFound`]
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
