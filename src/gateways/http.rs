use crate::domain::payment::SettledBy;
use crate::gateways::{ChargeRequest, SettlementGateway};
use anyhow::{bail, Result};

pub struct HttpGateway {
    pub kind: SettledBy,
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl SettlementGateway for HttpGateway {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    async fn submit(&self, request: &ChargeRequest) -> Result<()> {
        let url = format!("{}/payments", self.base_url);
        let resp = self
            .client
            .post(url)
            .json(request)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            bail!("{} gateway returned HTTP {}", self.kind.as_str(), resp.status().as_u16());
        }

        Ok(())
    }
}
