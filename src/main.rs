use axum::routing::{get, post};
use axum::Router;
use payment_settlement::config::AppConfig;
use payment_settlement::dedup::store_redis::DedupStoreRedis;
use payment_settlement::domain::payment::SettledBy;
use payment_settlement::gateways::http::HttpGateway;
use payment_settlement::queue::store_redis::PaymentQueueRedis;
use payment_settlement::repo::payments_repo::PaymentsRepo;
use payment_settlement::service::consumer_pool::{ConsumerPool, PoolSettings};
use payment_settlement::service::dispatcher::GatewayDispatcher;
use payment_settlement::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let queue = Arc::new(PaymentQueueRedis {
        client: redis::Client::open(cfg.redis_url.clone())?,
        queue_key: cfg.queue_key.clone(),
        dead_letter_key: cfg.dead_letter_key.clone(),
    });
    let dedup = Arc::new(DedupStoreRedis {
        client: redis::Client::open(cfg.redis_url.clone())?,
    });
    let payments_repo = PaymentsRepo { pool: pool.clone() };

    let client = reqwest::Client::new();
    let dispatcher = Arc::new(GatewayDispatcher {
        default_gateway: Arc::new(HttpGateway {
            kind: SettledBy::Default,
            base_url: cfg.default_gateway_url.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client: client.clone(),
        }),
        fallback_gateway: Arc::new(HttpGateway {
            kind: SettledBy::Fallback,
            base_url: cfg.fallback_gateway_url.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client,
        }),
        max_attempts: cfg.gateway_max_attempts,
        retry_delay: std::time::Duration::from_millis(cfg.gateway_retry_delay_ms),
    });

    let pool_handle = ConsumerPool {
        queue: queue.clone(),
        dedup,
        dispatcher,
        sink: Arc::new(payments_repo.clone()),
        settings: PoolSettings::from_config(&cfg),
    }
    .spawn();

    let state = AppState {
        queue,
        payments_repo,
        redis_client: redis::Client::open(cfg.redis_url.clone())?,
    };

    let app = Router::new()
        .route("/health", get(payment_settlement::http::handlers::payments::health))
        .route("/payments", post(payment_settlement::http::handlers::payments::create_payment))
        .route(
            "/payments-summary",
            get(payment_settlement::http::handlers::summary::payments_summary),
        )
        .route("/ops/readiness", get(payment_settlement::http::handlers::ops::readiness))
        .route("/ops/liveness", get(payment_settlement::http::handlers::ops::liveness))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("draining settlement workers");
    pool_handle.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
