//! The write-coalescing queue and its drain worker.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Notify;
use tokio_util::task::TaskTracker;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::QueueConfig;

/// Category of a pending operation, determining its eligibility delay and
/// its position in the per-cycle drain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpClass {
    /// Store reads (listings, lookups).
    Read,
    /// Mutations of existing items (select, deselect, reorder).
    Update,
    /// Item creation.
    Create,
}

impl OpClass {
    /// Fixed drain priority per cycle: reads first so they are never starved
    /// behind slower creations.
    pub const DRAIN_ORDER: [OpClass; 3] = [OpClass::Read, OpClass::Update, OpClass::Create];
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpClass::Read => "read",
            OpClass::Update => "update",
            OpClass::Create => "create",
        };
        f.write_str(name)
    }
}

/// A unit of work executed by the drain worker.
///
/// Errors are logged at the drain boundary and the operation is dropped;
/// the queue never retries. Callers wire outcomes through channels closed
/// over by the future.
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// A registered operation waiting for its eligibility delay.
struct PendingOp {
    class: OpClass,
    dedup_key: String,
    work: WorkFuture,
    enqueued_at: Instant,
}

/// Write-coalescing operation queue.
///
/// Construct one per process and share it via `Arc`; [`WriteQueue::start`]
/// spawns the single drain worker. [`WriteQueue::submit`] is safe from any
/// number of concurrent callers and never suspends.
///
/// Per pending operation the lifecycle is Registered, then Eligible once the
/// class delay has elapsed, then Executing. The entry leaves the pending map
/// the moment the worker takes it for execution, so a same-key submission
/// arriving mid-execution registers a fresh, independent operation.
pub struct WriteQueue {
    config: QueueConfig,
    /// The only shared mutable state: pending operations keyed by identity.
    pending: Mutex<HashMap<(OpClass, String), PendingOp>>,
    /// Guards against overlapping drain cycles. A losing attempt defers to
    /// the holder's cycle instead of blocking.
    draining: AtomicBool,
    /// Wakes the drain worker on submission.
    wake: Notify,
    shutdown: Notify,
    tracker: TaskTracker,
}

impl WriteQueue {
    /// Create a queue wrapped in `Arc` for shared ownership.
    pub fn new(config: QueueConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            pending: Mutex::new(HashMap::new()),
            draining: AtomicBool::new(false),
            wake: Notify::new(),
            shutdown: Notify::new(),
            tracker: TaskTracker::new(),
        })
    }

    /// Start the drain worker.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        info!("starting write queue drain worker");
        let tracker = self.tracker.clone();
        tracker.spawn(async move {
            self.run().await;
        })
    }

    /// Register an operation, unless one with the same `(class, dedup_key)`
    /// identity is already pending.
    ///
    /// Non-blocking and never suspends. On a duplicate the new `work` is
    /// dropped unexecuted; the first registration wins, keeping its own
    /// unit of work and enqueue timestamp.
    pub fn submit(&self, class: OpClass, dedup_key: impl Into<String>, work: WorkFuture) {
        let dedup_key = dedup_key.into();
        {
            let mut pending = self.lock_pending();
            match pending.entry((class, dedup_key.clone())) {
                std::collections::hash_map::Entry::Occupied(_) => {
                    debug!(%class, %dedup_key, "coalesced duplicate submission");
                    return;
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(PendingOp {
                        class,
                        dedup_key: dedup_key.clone(),
                        work,
                        enqueued_at: Instant::now(),
                    });
                }
            }
        }
        debug!(%class, %dedup_key, "registered operation");
        self.wake.notify_one();
    }

    /// Number of operations currently pending.
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    /// Stop the drain worker and wait for it to finish the current cycle.
    pub async fn shutdown(&self) {
        self.shutdown.notify_one();
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Drain worker loop: park while idle, poll while work remains.
    async fn run(&self) {
        loop {
            if self.lock_pending().is_empty() {
                tokio::select! {
                    _ = self.wake.notified() => {}
                    _ = self.shutdown.notified() => {
                        info!("write queue drain worker shutting down");
                        break;
                    }
                }
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.poll_interval()) => {}
                    _ = self.wake.notified() => {}
                    _ = self.shutdown.notified() => {
                        info!("write queue drain worker shutting down");
                        break;
                    }
                }
            }
            self.drain_cycle().await;
        }
    }

    /// One drain cycle over all classes in fixed priority order.
    async fn drain_cycle(&self) {
        if self
            .draining
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // another cycle is in flight; its entries were already taken
            return;
        }
        for class in OpClass::DRAIN_ORDER {
            self.drain_class(class).await;
        }
        self.draining.store(false, Ordering::Release);
    }

    /// Execute every eligible operation of one class, sequentially.
    async fn drain_class(&self, class: OpClass) {
        let delay = self.config.delay(class);
        let now = Instant::now();
        // Entries are removed here, before execution, under the map lock:
        // one operation per dedup key (the map key guarantees uniqueness)
        // and no entry can be taken twice by overlapping cycles.
        let mut eligible: Vec<PendingOp> = {
            let mut pending = self.lock_pending();
            let due: Vec<(OpClass, String)> = pending
                .iter()
                .filter(|((entry_class, _), op)| {
                    *entry_class == class && now.duration_since(op.enqueued_at) >= delay
                })
                .map(|(identity, _)| identity.clone())
                .collect();
            due.into_iter().filter_map(|identity| pending.remove(&identity)).collect()
        };
        if eligible.is_empty() {
            return;
        }
        eligible.sort_by_key(|op| op.enqueued_at);
        debug!(%class, count = eligible.len(), "draining eligible operations");
        for op in eligible {
            if let Err(error) = op.work.await {
                // silent-drop policy: report and move on, never retry
                warn!(
                    class = %op.class,
                    dedup_key = %op.dedup_key,
                    error = %error,
                    "queued operation failed"
                );
            }
        }
    }

    /// A poisoned lock still holds a usable map; inserts and removes are
    /// individually atomic.
    fn lock_pending(&self) -> MutexGuard<'_, HashMap<(OpClass, String), PendingOp>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
