use anyhow::Result;

pub mod store_redis;

/// Durable FIFO queue of serialized payments. Producers push to the tail,
/// workers pop from the head; payments that exhaust both gateways go to a
/// separate dead-letter list.
#[async_trait::async_trait]
pub trait PaymentQueue: Send + Sync {
    async fn push(&self, payload: String) -> Result<()>;

    /// Non-blocking pop of the oldest entry, `None` when the queue is empty.
    async fn pop(&self) -> Result<Option<String>>;

    async fn push_dead_letter(&self, payload: String) -> Result<()>;
}
