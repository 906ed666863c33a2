use crate::dedup::DedupStore;
use anyhow::Result;
use redis::AsyncCommands;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct DedupStoreRedis {
    pub client: redis::Client,
}

fn settled_key(correlation_id: Uuid) -> String {
    correlation_id.to_string()
}

#[async_trait::async_trait]
impl DedupStore for DedupStoreRedis {
    async fn try_claim(&self, correlation_id: Uuid, ttl: Duration) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // SET NX EX: one round-trip, no check-then-set window.
        let reply: Option<String> = redis::cmd("SET")
            .arg(settled_key(correlation_id))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn release(&self, correlation_id: Uuid) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: usize = conn.del(settled_key(correlation_id)).await?;
        Ok(())
    }
}
