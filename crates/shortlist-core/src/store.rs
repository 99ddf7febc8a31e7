//! The store abstraction consumed by the ordering engine.

use async_trait::async_trait;
use shortlist_order::OrderKey;

use crate::error::ItemStoreError;
use crate::types::Item;
use crate::types::ItemPage;
use crate::types::ItemPatch;
use crate::types::ItemQuery;

/// Backing store for the item collection.
///
/// The engine only ever needs point reads, boundary-key lookups among the
/// selected items, and single-item upserts. Every call may fail
/// independently; implementations decide transport, schema, and indexing.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Point lookup by item id.
    async fn get(&self, item_id: u64) -> Result<Option<Item>, ItemStoreError>;

    /// One page of items matching `query`.
    async fn list(&self, query: ItemQuery) -> Result<ItemPage, ItemStoreError>;

    /// Total number of items in the store, selected or not.
    async fn total(&self) -> Result<usize, ItemStoreError>;

    /// The largest order key among selected items, if any are selected.
    async fn max_selected_key(&self) -> Result<Option<OrderKey>, ItemStoreError>;

    /// The smallest order key among selected items, if any are selected.
    async fn min_selected_key(&self) -> Result<Option<OrderKey>, ItemStoreError>;

    /// Insert a new item. Fails with [`ItemStoreError::DuplicateItem`] if the
    /// id is already present.
    async fn insert(&self, item: Item) -> Result<(), ItemStoreError>;

    /// Apply `patch` to an existing item and return the updated item. Fails
    /// with [`ItemStoreError::NotFound`] if the id is absent.
    async fn update(&self, item_id: u64, patch: ItemPatch) -> Result<Item, ItemStoreError>;
}
