use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettledBy {
    Default,
    Fallback,
}

impl SettledBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettledBy::Default => "default",
            SettledBy::Fallback => "fallback",
        }
    }
}

/// The unit of work carried through the queue. Immutable after enqueue
/// except for `settled_by`, written once by the worker that settles it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub correlation_id: Uuid,
    pub amount: Decimal,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_by: Option<SettledBy>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuePaymentRequest {
    pub correlation_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Default, Serialize)]
pub struct SettlementSummary {
    #[serde(rename = "default")]
    pub default_gateway: GatewayTotals,
    #[serde(rename = "fallback")]
    pub fallback_gateway: GatewayTotals,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTotals {
    pub total_requests: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

pub fn error_envelope(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}
