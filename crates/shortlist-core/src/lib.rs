//! Item types and the store abstraction for the shortlist ordering engine.
//!
//! The engine treats its backing store only through the [`ItemStore`] trait:
//! point reads, boundary-key lookups among selected items, and single-item
//! upserts, each of which may fail independently. Nothing here assumes a
//! storage engine, schema, or transport.
//!
//! [`MemoryItemStore`] is a deterministic, non-persistent implementation for
//! unit tests and simulation; it mirrors the behavior expected from a
//! production backend without network or disk I/O.

#![warn(missing_docs)]

mod error;
mod memory;
mod store;
mod types;

pub use error::ItemStoreError;
pub use memory::MemoryItemStore;
pub use store::ItemStore;
pub use types::Item;
pub use types::ItemPage;
pub use types::ItemPatch;
pub use types::ItemQuery;
pub use types::ListOrder;
