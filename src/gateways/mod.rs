use crate::domain::payment::Payment;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub mod http;
pub mod mock;

/// Wire shape of an outbound settlement call. Serialized once per payment
/// and reused across every retry and the fallback attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub correlation_id: Uuid,
    pub amount: Decimal,
    pub requested_at: DateTime<Utc>,
}

impl From<&Payment> for ChargeRequest {
    fn from(payment: &Payment) -> Self {
        Self {
            correlation_id: payment.correlation_id,
            amount: payment.amount,
            requested_at: payment.requested_at,
        }
    }
}

/// One external payment gateway. Success is any 2xx-equivalent response;
/// everything else is an error, undistinguished for retry purposes.
#[async_trait::async_trait]
pub trait SettlementGateway: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, request: &ChargeRequest) -> Result<()>;
}
