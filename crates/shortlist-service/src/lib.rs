//! Selection service for the shortlist ordering engine.
//!
//! Composes the order-key generator, write-coalescing queue, and item
//! store into the operations an API layer exposes: seeding,
//! listing, selecting, deselecting, reordering, and adding items. All store
//! mutations and listings flow through the queue; this is the only path by
//! which generated order keys reach the store.
//!
//! The generator, queue, and store are injected as `Arc` instances owned by
//! the caller, created at process start and torn down at process stop;
//! there is no global state.

#![warn(missing_docs)]

mod error;
mod service;

pub use error::Result;
pub use error::ServiceError;
pub use service::SelectionService;
