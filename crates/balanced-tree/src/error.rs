use std::collections::TryReserveError;

use thiserror::Error;

/// Errors surfaced by [`BalancedTree`](crate::BalancedTree).
///
/// Lookups, duplicate inserts and deletes of absent values never fail. Only
/// node allocation and the diagnostic invariant checks produce errors.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to allocate tree node: {0}")]
    AllocationFailed(#[from] TryReserveError),
    #[error("tree node capacity exceeded (limit {limit})")]
    CapacityExceeded { limit: usize },
    #[error("tree invariant violated: {0}")]
    Invariant(String),
}
