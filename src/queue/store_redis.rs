use crate::queue::PaymentQueue;
use anyhow::Result;
use redis::AsyncCommands;

#[derive(Clone)]
pub struct PaymentQueueRedis {
    pub client: redis::Client,
    pub queue_key: String,
    pub dead_letter_key: String,
}

#[async_trait::async_trait]
impl PaymentQueue for PaymentQueueRedis {
    async fn push(&self, payload: String) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.rpush(&self.queue_key, payload).await?;
        Ok(())
    }

    async fn pop(&self) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.lpop(&self.queue_key, None).await?;
        Ok(value)
    }

    async fn push_dead_letter(&self, payload: String) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.rpush(&self.dead_letter_key, payload).await?;
        Ok(())
    }
}
