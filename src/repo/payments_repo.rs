use crate::domain::payment::{GatewayTotals, Payment, SettlementSummary};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Bulk-write sink for settled payments. One call per batch; a duplicate
/// correlation id fails the whole batch (primary-key contract).
#[async_trait::async_trait]
pub trait PaymentSink: Send + Sync {
    async fn write_batch(&self, batch: &[Payment]) -> Result<()>;
}

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

impl PaymentsRepo {
    pub async fn summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<SettlementSummary> {
        let rows = sqlx::query(
            r#"
            SELECT settled_by,
                   COUNT(*) AS total_requests,
                   COALESCE(SUM(amount), 0) AS total_amount
            FROM payments
            WHERE ($1::timestamptz IS NULL OR requested_at >= $1)
              AND ($2::timestamptz IS NULL OR requested_at <= $2)
            GROUP BY settled_by
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut summary = SettlementSummary::default();
        for row in rows {
            let settled_by: String = row.get("settled_by");
            let totals = GatewayTotals {
                total_requests: row.get("total_requests"),
                total_amount: row.get("total_amount"),
            };
            match settled_by.as_str() {
                "default" => summary.default_gateway = totals,
                "fallback" => summary.fallback_gateway = totals,
                _ => {}
            }
        }

        Ok(summary)
    }
}

#[async_trait::async_trait]
impl PaymentSink for PaymentsRepo {
    async fn write_batch(&self, batch: &[Payment]) -> Result<()> {
        let mut correlation_ids: Vec<Uuid> = Vec::with_capacity(batch.len());
        let mut amounts: Vec<Decimal> = Vec::with_capacity(batch.len());
        let mut requested_ats: Vec<DateTime<Utc>> = Vec::with_capacity(batch.len());
        let mut settled_bys: Vec<String> = Vec::with_capacity(batch.len());

        for payment in batch {
            let settled_by = payment
                .settled_by
                .ok_or_else(|| anyhow!("payment {} buffered without settled_by", payment.correlation_id))?;
            correlation_ids.push(payment.correlation_id);
            amounts.push(payment.amount);
            requested_ats.push(payment.requested_at);
            settled_bys.push(settled_by.as_str().to_string());
        }

        sqlx::query(
            r#"
            INSERT INTO payments (correlation_id, amount, requested_at, settled_by)
            SELECT * FROM UNNEST($1::uuid[], $2::numeric[], $3::timestamptz[], $4::text[])
            "#,
        )
        .bind(&correlation_ids)
        .bind(&amounts)
        .bind(&requested_ats)
        .bind(&settled_bys)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
