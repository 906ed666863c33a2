use crate::domain::payment::{Payment, SettledBy};
use crate::gateways::{ChargeRequest, SettlementGateway};
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

/// Sends one payment through the default gateway under a fixed retry budget,
/// then fails over to the fallback gateway exactly once. Stateless; shared
/// by every worker.
pub struct GatewayDispatcher {
    pub default_gateway: Arc<dyn SettlementGateway>,
    pub fallback_gateway: Arc<dyn SettlementGateway>,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl GatewayDispatcher {
    pub async fn dispatch(&self, payment: &Payment) -> Result<SettledBy> {
        let request = ChargeRequest::from(payment);

        for attempt in 1..=self.max_attempts {
            match self.default_gateway.submit(&request).await {
                Ok(()) => {
                    tracing::info!(
                        "payment {} settled by {} on attempt {}",
                        payment.correlation_id,
                        self.default_gateway.name(),
                        attempt
                    );
                    return Ok(SettledBy::Default);
                }
                Err(err) => {
                    tracing::warn!(
                        "attempt {} on {} failed for payment {}: {}",
                        attempt,
                        self.default_gateway.name(),
                        payment.correlation_id,
                        err
                    );
                }
            }
            tokio::time::sleep(self.retry_delay).await;
        }

        match self.fallback_gateway.submit(&request).await {
            Ok(()) => {
                tracing::info!(
                    "payment {} settled by {}",
                    payment.correlation_id,
                    self.fallback_gateway.name()
                );
                Ok(SettledBy::Fallback)
            }
            Err(err) => {
                tracing::warn!(
                    "{} failed for payment {}: {}",
                    self.fallback_gateway.name(),
                    payment.correlation_id,
                    err
                );
                bail!("both gateways exhausted for payment {}", payment.correlation_id)
            }
        }
    }
}
