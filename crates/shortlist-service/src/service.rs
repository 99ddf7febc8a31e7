//! The selection service.

use std::future::Future;
use std::sync::Arc;

use shortlist_core::Item;
use shortlist_core::ItemPage;
use shortlist_core::ItemPatch;
use shortlist_core::ItemQuery;
use shortlist_core::ItemStore;
use shortlist_order::KeyGenerator;
use shortlist_order::OrderKey;
use shortlist_queue::OpClass;
use shortlist_queue::WriteQueue;
use snafu::ResultExt;
use snafu::ensure;
use tokio::sync::oneshot;
use tracing::debug;
use tracing::info;

use crate::error::CoalescedSnafu;
use crate::error::ItemExistsSnafu;
use crate::error::ItemNotFoundSnafu;
use crate::error::OrderKeySnafu;
use crate::error::Result;
use crate::error::StoreSnafu;

/// Items created per progress log line while seeding.
const SEED_LOG_INTERVAL: u64 = 10_000;

/// Orchestrates item operations over the injected generator, queue, and
/// store.
///
/// Every operation other than [`seed`](SelectionService::seed) is submitted
/// to the write queue and therefore subject to coalescing and the class
/// eligibility delay. The outcome travels back to the caller through a
/// oneshot channel closed into the unit of work; a submission that folds
/// into an earlier identical pending operation resolves to
/// [`ServiceError::Coalesced`](crate::ServiceError::Coalesced) instead of
/// waiting forever on a channel nobody will ever complete.
pub struct SelectionService<S: ItemStore + ?Sized> {
    store: Arc<S>,
    keys: Arc<KeyGenerator>,
    queue: Arc<WriteQueue>,
}

impl<S: ItemStore + ?Sized + 'static> SelectionService<S> {
    /// Create a service over the given collaborators.
    pub fn new(store: Arc<S>, keys: Arc<KeyGenerator>, queue: Arc<WriteQueue>) -> Self {
        Self { store, keys, queue }
    }

    /// Populate an empty store with `count` items carrying strictly
    /// increasing order keys. Returns the number of items created; a
    /// non-empty store is left untouched.
    ///
    /// Runs against the store directly; seeding happens before the service
    /// starts taking queued traffic.
    pub async fn seed(&self, count: u64) -> Result<u64> {
        let existing = self.store.total().await.context(StoreSnafu)?;
        if existing > 0 {
            info!(existing, "store already populated, skipping seed");
            return Ok(0);
        }
        info!(count, "seeding item collection");
        let mut last: Option<OrderKey> = None;
        for id in 1..=count {
            let key = self.keys.after(last.as_ref()).context(OrderKeySnafu)?;
            let mut item = Item::new(id);
            item.order_key = Some(key.clone());
            self.store.insert(item).await.context(StoreSnafu)?;
            last = Some(key);
            if id % SEED_LOG_INTERVAL == 0 {
                info!(created = id, "seed progress");
            }
        }
        info!(count, "seed complete");
        Ok(count)
    }

    /// One page of the collection filtered by selection flag, ordered by
    /// item id.
    pub async fn list_items(
        &self,
        page: usize,
        limit: usize,
        min_item_id: Option<u64>,
        selected: bool,
    ) -> Result<ItemPage> {
        let store = Arc::clone(&self.store);
        let dedup_key = format!("items-{}-{selected}-{page}", fmt_min(min_item_id));
        let query = ItemQuery::browse(selected, min_item_id, page * limit, limit);
        self.run_queued(OpClass::Read, dedup_key, async move {
            store.list(query).await.context(StoreSnafu)
        })
        .await
    }

    /// One page of the selected sequence in manual order.
    pub async fn list_selected(
        &self,
        page: usize,
        limit: usize,
        min_item_id: Option<u64>,
    ) -> Result<ItemPage> {
        let store = Arc::clone(&self.store);
        let dedup_key = format!("selected-{}-{page}", fmt_min(min_item_id));
        let query = ItemQuery::selected_sequence(min_item_id, page * limit, limit);
        self.run_queued(OpClass::Read, dedup_key, async move {
            store.list(query).await.context(StoreSnafu)
        })
        .await
    }

    /// Select an item, appending it to the end of the selected sequence.
    pub async fn select_item(&self, item_id: u64) -> Result<Item> {
        let store = Arc::clone(&self.store);
        let keys = Arc::clone(&self.keys);
        self.run_queued(OpClass::Update, format!("select-{item_id}"), async move {
            Self::apply_select(store, keys, item_id).await
        })
        .await
    }

    /// Remove an item from the selected sequence.
    pub async fn deselect_item(&self, item_id: u64) -> Result<Item> {
        let store = Arc::clone(&self.store);
        self.run_queued(OpClass::Update, format!("deselect-{item_id}"), async move {
            let existing = store.get(item_id).await.context(StoreSnafu)?;
            ensure!(existing.is_some(), ItemNotFoundSnafu { item_id });
            store.update(item_id, ItemPatch::deselect()).await.context(StoreSnafu)
        })
        .await
    }

    /// Move an item between two neighbors in the selected sequence.
    ///
    /// `prev`/`next` are the order keys of the drop position's neighbors as
    /// the client observed them; either bound may be open at a sequence end.
    pub async fn reorder_item(
        &self,
        item_id: u64,
        prev: Option<OrderKey>,
        next: Option<OrderKey>,
    ) -> Result<Item> {
        let store = Arc::clone(&self.store);
        let keys = Arc::clone(&self.keys);
        self.run_queued(OpClass::Update, format!("reorder-{item_id}"), async move {
            let existing = store.get(item_id).await.context(StoreSnafu)?;
            ensure!(existing.is_some(), ItemNotFoundSnafu { item_id });
            let key = keys.between(prev.as_ref(), next.as_ref()).context(OrderKeySnafu)?;
            store.update(item_id, ItemPatch::reorder(key)).await.context(StoreSnafu)
        })
        .await
    }

    /// Create a new item.
    ///
    /// The item gets a key after the current end of the selected sequence so
    /// it can never collide with an existing selected position (the fixed
    /// initial key is used only when nothing is selected yet).
    pub async fn add_item(&self, item_id: u64) -> Result<Item> {
        let store = Arc::clone(&self.store);
        let keys = Arc::clone(&self.keys);
        self.run_queued(OpClass::Create, format!("add-{item_id}"), async move {
            let existing = store.get(item_id).await.context(StoreSnafu)?;
            ensure!(existing.is_none(), ItemExistsSnafu { item_id });
            let last = store.max_selected_key().await.context(StoreSnafu)?;
            let key = keys.after(last.as_ref()).context(OrderKeySnafu)?;
            let mut item = Item::new(item_id);
            item.order_key = Some(key);
            store.insert(item.clone()).await.context(StoreSnafu)?;
            Ok(item)
        })
        .await
    }

    async fn apply_select(
        store: Arc<S>,
        keys: Arc<KeyGenerator>,
        item_id: u64,
    ) -> Result<Item> {
        let existing = store.get(item_id).await.context(StoreSnafu)?;
        ensure!(existing.is_some(), ItemNotFoundSnafu { item_id });
        let last = store.max_selected_key().await.context(StoreSnafu)?;
        let key = keys.after(last.as_ref()).context(OrderKeySnafu)?;
        store.update(item_id, ItemPatch::select(key)).await.context(StoreSnafu)
    }

    /// Submit `work` to the queue and await its outcome.
    ///
    /// The unit of work resolves the caller's oneshot before reporting its
    /// own result to the drain loop, so failures show up in both places: the
    /// caller gets the typed error, the queue logs the drop.
    async fn run_queued<T, F>(&self, class: OpClass, dedup_key: String, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let log_key = dedup_key.clone();
        self.queue.submit(
            class,
            dedup_key.clone(),
            Box::pin(async move {
                let outcome = work.await;
                let failure = outcome.as_ref().err().map(|error| error.to_string());
                if tx.send(outcome).is_err() {
                    debug!(dedup_key = %log_key, "caller went away before outcome delivery");
                }
                match failure {
                    Some(reason) => Err(anyhow::anyhow!(reason)),
                    None => Ok(()),
                }
            }),
        );
        match rx.await {
            Ok(outcome) => outcome,
            // the sender was dropped unexecuted: this submission folded into
            // an earlier pending operation with the same identity
            Err(_) => CoalescedSnafu { dedup_key }.fail(),
        }
    }
}

fn fmt_min(min_item_id: Option<u64>) -> String {
    min_item_id.map(|id| id.to_string()).unwrap_or_default()
}
