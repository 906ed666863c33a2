use crate::domain::payment::{error_envelope, EnqueuePaymentRequest, Payment};
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;

/// Ingress: structural validation only, then enqueue. Settlement is
/// asynchronous, so the submitter always gets 202 on acceptance.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<EnqueuePaymentRequest>,
) -> impl IntoResponse {
    if req.correlation_id.is_nil() {
        return (
            axum::http::StatusCode::BAD_REQUEST,
            Json(error_envelope("INVALID_CORRELATION_ID", "correlationId must be a non-nil UUID")),
        )
            .into_response();
    }
    if req.amount <= Decimal::ZERO {
        return (
            axum::http::StatusCode::BAD_REQUEST,
            Json(error_envelope("INVALID_AMOUNT", "amount must be greater than zero")),
        )
            .into_response();
    }

    let payment = Payment {
        correlation_id: req.correlation_id,
        amount: req.amount,
        requested_at: chrono::Utc::now(),
        settled_by: None,
    };

    let payload = match serde_json::to_string(&payment) {
        Ok(payload) => payload,
        Err(err) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_envelope("ENCODE_FAILED", &err.to_string())),
            )
                .into_response();
        }
    };

    match state.queue.push(payload).await {
        Ok(()) => axum::http::StatusCode::ACCEPTED.into_response(),
        Err(err) => {
            tracing::error!("failed to enqueue payment {}: {}", payment.correlation_id, err);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_envelope("ENQUEUE_FAILED", "payment could not be queued")),
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
