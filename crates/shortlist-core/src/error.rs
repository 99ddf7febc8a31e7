//! Error types for item store operations.

use thiserror::Error;

/// Errors returned by [`ItemStore`](crate::ItemStore) implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemStoreError {
    /// No item with the given id exists.
    #[error("item {item_id} not found")]
    NotFound {
        /// The missing item id.
        item_id: u64,
    },

    /// An item with the given id already exists.
    #[error("item {item_id} already exists")]
    DuplicateItem {
        /// The conflicting item id.
        item_id: u64,
    },

    /// The backend failed to perform the operation.
    #[error("store operation failed: {reason}")]
    Failed {
        /// Backend-specific failure description.
        reason: String,
    },

    /// The operation did not complete in time.
    #[error("store operation timed out after {duration_ms}ms")]
    Timeout {
        /// How long the operation waited.
        duration_ms: u64,
    },
}
