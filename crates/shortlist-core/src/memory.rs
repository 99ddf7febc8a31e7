//! In-memory deterministic implementation of [`ItemStore`] for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use shortlist_order::OrderKey;
use tokio::sync::Mutex;

use crate::error::ItemStoreError;
use crate::store::ItemStore;
use crate::types::Item;
use crate::types::ItemPage;
use crate::types::ItemPatch;
use crate::types::ItemQuery;
use crate::types::ListOrder;

/// In-memory deterministic implementation of [`ItemStore`].
///
/// Stores items in a `BTreeMap` without persistence, making it useful for
/// unit tests and simulation where repeatability matters more than
/// durability. Operations are instant and never fail spuriously.
#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<BTreeMap<u64, Item>>,
}

impl MemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(item: &Item, query: &ItemQuery) -> bool {
        if item.selected != query.selected {
            return false;
        }
        match query.min_item_id {
            Some(min) => item.id >= min,
            None => true,
        }
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn get(&self, item_id: u64) -> Result<Option<Item>, ItemStoreError> {
        let items = self.items.lock().await;
        Ok(items.get(&item_id).cloned())
    }

    async fn list(&self, query: ItemQuery) -> Result<ItemPage, ItemStoreError> {
        let items = self.items.lock().await;
        let mut matches: Vec<Item> =
            items.values().filter(|item| Self::matches(item, &query)).cloned().collect();
        match query.order {
            // BTreeMap already yields ascending ids
            ListOrder::ItemId => {}
            ListOrder::OrderKey => {
                matches.sort_by(|a, b| a.order_key.cmp(&b.order_key).then(a.id.cmp(&b.id)));
            }
        }
        let total = matches.len();
        let page: Vec<Item> =
            matches.into_iter().skip(query.offset).take(query.limit).collect();
        let has_more = query.offset + page.len() < total;
        Ok(ItemPage {
            items: page,
            total,
            has_more,
        })
    }

    async fn total(&self) -> Result<usize, ItemStoreError> {
        Ok(self.items.lock().await.len())
    }

    async fn max_selected_key(&self) -> Result<Option<OrderKey>, ItemStoreError> {
        let items = self.items.lock().await;
        Ok(items
            .values()
            .filter(|item| item.selected)
            .filter_map(|item| item.order_key.clone())
            .max())
    }

    async fn min_selected_key(&self) -> Result<Option<OrderKey>, ItemStoreError> {
        let items = self.items.lock().await;
        Ok(items
            .values()
            .filter(|item| item.selected)
            .filter_map(|item| item.order_key.clone())
            .min())
    }

    async fn insert(&self, item: Item) -> Result<(), ItemStoreError> {
        let mut items = self.items.lock().await;
        if items.contains_key(&item.id) {
            return Err(ItemStoreError::DuplicateItem { item_id: item.id });
        }
        items.insert(item.id, item);
        Ok(())
    }

    async fn update(&self, item_id: u64, patch: ItemPatch) -> Result<Item, ItemStoreError> {
        let mut items = self.items.lock().await;
        let item = items.get_mut(&item_id).ok_or(ItemStoreError::NotFound { item_id })?;
        if let Some(selected) = patch.selected {
            item.selected = selected;
        }
        if let Some(order_key) = patch.order_key {
            item.order_key = order_key;
        }
        Ok(item.clone())
    }
}
