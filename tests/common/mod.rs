#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use payment_settlement::batch::BatchBuffer;
use payment_settlement::dedup::DedupStore;
use payment_settlement::domain::payment::Payment;
use payment_settlement::gateways::mock::{MockBehavior, MockGateway};
use payment_settlement::queue::PaymentQueue;
use payment_settlement::repo::payments_repo::PaymentSink;
use payment_settlement::service::consumer_pool::Worker;
use payment_settlement::service::dispatcher::GatewayDispatcher;
use rust_decimal::Decimal;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryQueue {
    items: Mutex<VecDeque<String>>,
    dead_letters: Mutex<Vec<String>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_payment(&self, payment: &Payment) {
        self.items
            .lock()
            .unwrap()
            .push_back(serde_json::to_string(payment).unwrap());
    }

    pub fn enqueue_raw(&self, payload: &str) {
        self.items.lock().unwrap().push_back(payload.to_string());
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn dead_letters(&self) -> Vec<String> {
        self.dead_letters.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentQueue for InMemoryQueue {
    async fn push(&self, payload: String) -> Result<()> {
        self.items.lock().unwrap().push_back(payload);
        Ok(())
    }

    async fn pop(&self) -> Result<Option<String>> {
        Ok(self.items.lock().unwrap().pop_front())
    }

    async fn push_dead_letter(&self, payload: String) -> Result<()> {
        self.dead_letters.lock().unwrap().push(payload);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDedup {
    claimed: Mutex<HashSet<Uuid>>,
    fail_claims: AtomicBool,
}

impl InMemoryDedup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_claims.store(failing, Ordering::SeqCst);
    }

    pub fn is_claimed(&self, correlation_id: Uuid) -> bool {
        self.claimed.lock().unwrap().contains(&correlation_id)
    }
}

#[async_trait]
impl DedupStore for InMemoryDedup {
    async fn try_claim(&self, correlation_id: Uuid, _ttl: Duration) -> Result<bool> {
        if self.fail_claims.load(Ordering::SeqCst) {
            bail!("dedup store unavailable");
        }
        Ok(self.claimed.lock().unwrap().insert(correlation_id))
    }

    async fn release(&self, correlation_id: Uuid) -> Result<()> {
        self.claimed.lock().unwrap().remove(&correlation_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<Payment>>>,
    fail_writes: AtomicBool,
    failed_writes: AtomicU32,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn batches(&self) -> Vec<Vec<Payment>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn rows(&self) -> Vec<Payment> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn failed_writes(&self) -> u32 {
        self.failed_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentSink for RecordingSink {
    async fn write_batch(&self, batch: &[Payment]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            self.failed_writes.fetch_add(1, Ordering::SeqCst);
            bail!("bulk write rejected");
        }
        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(())
    }
}

pub fn pending_payment(amount: Decimal) -> Payment {
    Payment {
        correlation_id: Uuid::new_v4(),
        amount,
        requested_at: Utc::now(),
        settled_by: None,
    }
}

pub fn mock_dispatcher(
    default_behavior: MockBehavior,
    fallback_behavior: MockBehavior,
) -> (Arc<GatewayDispatcher>, Arc<MockGateway>, Arc<MockGateway>) {
    let default_gateway = Arc::new(MockGateway::new("default", default_behavior));
    let fallback_gateway = Arc::new(MockGateway::new("fallback", fallback_behavior));
    let dispatcher = Arc::new(GatewayDispatcher {
        default_gateway: default_gateway.clone(),
        fallback_gateway: fallback_gateway.clone(),
        max_attempts: 3,
        retry_delay: Duration::from_millis(1),
    });
    (dispatcher, default_gateway, fallback_gateway)
}

pub fn test_worker(
    queue: Arc<InMemoryQueue>,
    dedup: Arc<InMemoryDedup>,
    dispatcher: Arc<GatewayDispatcher>,
    sink: Arc<RecordingSink>,
    batch_max_size: usize,
    flush_interval: Duration,
) -> (Worker, watch::Sender<bool>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = Worker {
        id: 0,
        queue,
        dedup,
        dispatcher,
        sink,
        buffer: BatchBuffer::new(batch_max_size, flush_interval),
        dedup_ttl: Duration::from_secs(300),
        idle_poll: Duration::from_millis(2),
        error_backoff: Duration::from_millis(5),
        shutdown: shutdown_rx,
    };
    (worker, shutdown_tx)
}
