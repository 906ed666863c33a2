use crate::gateways::{ChargeRequest, SettlementGateway};
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    AlwaysSucceed,
    AlwaysFail,
    /// Fail the first N calls, succeed afterwards.
    FailFirst(u32),
}

pub struct MockGateway {
    pub gateway_name: String,
    pub behavior: MockBehavior,
    pub calls: AtomicU32,
}

impl MockGateway {
    pub fn new(gateway_name: &str, behavior: MockBehavior) -> Self {
        Self {
            gateway_name: gateway_name.to_string(),
            behavior,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SettlementGateway for MockGateway {
    fn name(&self) -> &str {
        &self.gateway_name
    }

    async fn submit(&self, request: &ChargeRequest) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::AlwaysSucceed => Ok(()),
            MockBehavior::AlwaysFail => {
                bail!("{} declined payment {}", self.gateway_name, request.correlation_id)
            }
            MockBehavior::FailFirst(n) if call < n => {
                bail!("{} declined payment {}", self.gateway_name, request.correlation_id)
            }
            MockBehavior::FailFirst(_) => Ok(()),
        }
    }
}
