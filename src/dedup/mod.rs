use anyhow::Result;
use std::time::Duration;
use uuid::Uuid;

pub mod store_redis;

/// Shared settlement marker store. `try_claim` is a single atomic
/// claim-if-absent round-trip: it returns `false` when the correlation id is
/// already claimed, so at most one worker ever dispatches a given payment.
/// A claim is released only when the dispatch it guarded failed outright.
///
/// Store errors propagate; they are never read as "settled" or "not settled".
#[async_trait::async_trait]
pub trait DedupStore: Send + Sync {
    async fn try_claim(&self, correlation_id: Uuid, ttl: Duration) -> Result<bool>;

    async fn release(&self, correlation_id: Uuid) -> Result<()>;
}
