use std::time::Duration;

use shared::networking::NodeAddress;

/// Longest pause between two attempts of the same partition.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Chooses the node that computes partition `index`.
pub trait AssignmentStrategy: Send + Sync {
    /// `None` only when `nodes` is empty.
    fn assign(&self, index: usize, nodes: &[NodeAddress]) -> Option<NodeAddress>;
}

/// Partition `i` goes to `nodes[i mod nodes.len()]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl AssignmentStrategy for RoundRobin {
    fn assign(&self, index: usize, nodes: &[NodeAddress]) -> Option<NodeAddress> {
        if nodes.is_empty() {
            return None;
        }
        nodes.get(index % nodes.len()).cloned()
    }
}

/// How often a failed partition is re-sent before the render is abandoned.
///
/// The default never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Pause before retry number `retry` (1-based): `backoff · 2^(retry-1)`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}
