use std::sync::Arc;

pub mod batch;
pub mod config;
pub mod dedup;
pub mod domain {
    pub mod payment;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
        pub mod summary;
    }
}
pub mod queue;
pub mod repo {
    pub mod payments_repo;
}
pub mod service {
    pub mod consumer_pool;
    pub mod dispatcher;
}

#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<dyn queue::PaymentQueue>,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub redis_client: redis::Client,
}
