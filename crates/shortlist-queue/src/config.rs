//! Queue configuration.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::queue::OpClass;

/// Configuration for coalescing behavior.
///
/// Each operation class has a fixed eligibility delay: the minimum time an
/// operation waits after enqueue before it may execute. The delay is the
/// debounce window: duplicate submissions inside it collapse into one
/// execution. The poll interval re-arms the drain worker while operations
/// remain pending and must be shorter than every delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Eligibility delay for read operations (milliseconds).
    pub read_delay_ms: u64,
    /// Eligibility delay for update operations (milliseconds).
    pub update_delay_ms: u64,
    /// Eligibility delay for item-creation operations (milliseconds).
    /// Longer than the others: creations are the most expensive writes and
    /// the most likely to be double-submitted.
    pub create_delay_ms: u64,
    /// Re-arm interval between drain cycles while work remains (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            read_delay_ms: 1_000,
            update_delay_ms: 1_000,
            create_delay_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl QueueConfig {
    /// Short delays for latency-sensitive deployments and tests.
    pub fn low_latency() -> Self {
        Self {
            read_delay_ms: 25,
            update_delay_ms: 25,
            create_delay_ms: 50,
            poll_interval_ms: 5,
        }
    }

    /// The eligibility delay for `class`.
    pub fn delay(&self, class: OpClass) -> Duration {
        let ms = match class {
            OpClass::Read => self.read_delay_ms,
            OpClass::Update => self.update_delay_ms,
            OpClass::Create => self.create_delay_ms,
        };
        Duration::from_millis(ms)
    }

    /// The drain re-arm interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
