//! Error types for the selection service.

use shortlist_core::ItemStoreError;
use shortlist_order::OrderKeyError;
use snafu::Snafu;

/// Result type for selection service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Errors surfaced to callers of the selection service.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    /// No item with the given id exists.
    #[snafu(display("item {item_id} not found"))]
    ItemNotFound {
        /// The missing item id.
        item_id: u64,
    },

    /// An item with the given id already exists.
    #[snafu(display("item {item_id} already exists"))]
    ItemExists {
        /// The conflicting item id.
        item_id: u64,
    },

    /// The backing store failed.
    #[snafu(display("store error: {source}"))]
    Store {
        /// Underlying store error.
        source: ItemStoreError,
    },

    /// Order-key generation failed.
    #[snafu(display("order key error: {source}"))]
    OrderKey {
        /// Underlying generator error.
        source: OrderKeyError,
    },

    /// The request was coalesced into an earlier identical pending operation.
    ///
    /// The earlier operation's caller receives the outcome; this caller's
    /// unit of work was never registered. Retry after the debounce window if
    /// an independent execution is required.
    #[snafu(display("request coalesced into pending operation '{dedup_key}'"))]
    Coalesced {
        /// Identity of the operation this request folded into.
        dedup_key: String,
    },
}
