//! Write-coalescing operation queue.
//!
//! Many concurrent callers submit keyed units of work; the queue collapses
//! duplicate submissions for the same logical operation, holds each operation
//! for a per-class eligibility delay so rapid bursts fold into a single
//! execution, and drains eligible operations with a single background worker
//! so the backing store never sees write amplification from the UI's request
//! patterns.
//!
//! Submission is fire-and-register: `submit` never blocks and never returns
//! the operation's outcome. Callers that need the result close a channel
//! (typically a oneshot sender) into the unit of work.
//!
//! # Example
//!
//! ```ignore
//! use shortlist_queue::{OpClass, QueueConfig, WriteQueue};
//!
//! let queue = WriteQueue::new(QueueConfig::default());
//! queue.clone().start();
//!
//! queue.submit(OpClass::Update, "select-42", Box::pin(async move {
//!     // talk to the store, resolve the caller's channel
//!     Ok(())
//! }));
//! ```

#![warn(missing_docs)]

mod config;
mod queue;

pub use config::QueueConfig;
pub use queue::OpClass;
pub use queue::WorkFuture;
pub use queue::WriteQueue;
