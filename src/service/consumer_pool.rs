use crate::batch::BatchBuffer;
use crate::dedup::DedupStore;
use crate::domain::payment::Payment;
use crate::queue::PaymentQueue;
use crate::repo::payments_repo::PaymentSink;
use crate::service::dispatcher::GatewayDispatcher;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct PoolSettings {
    pub worker_count: usize,
    pub batch_max_size: usize,
    pub flush_interval: Duration,
    pub dedup_ttl: Duration,
    pub idle_poll: Duration,
    pub error_backoff: Duration,
}

impl PoolSettings {
    pub fn from_config(cfg: &crate::config::AppConfig) -> Self {
        Self {
            worker_count: cfg.worker_count,
            batch_max_size: cfg.batch_max_size,
            flush_interval: Duration::from_millis(cfg.flush_interval_ms),
            dedup_ttl: Duration::from_secs(cfg.dedup_ttl_secs),
            idle_poll: Duration::from_millis(cfg.idle_poll_ms),
            error_backoff: Duration::from_millis(cfg.error_backoff_ms),
        }
    }
}

/// Fixed pool of identical workers draining the shared queue. Workers share
/// nothing mutable with each other; the queue, dedup store, dispatcher, and
/// sink are the only shared collaborators and each is safe for concurrent
/// use, so no pool-wide lock exists.
pub struct ConsumerPool {
    pub queue: Arc<dyn PaymentQueue>,
    pub dedup: Arc<dyn DedupStore>,
    pub dispatcher: Arc<GatewayDispatcher>,
    pub sink: Arc<dyn PaymentSink>,
    pub settings: PoolSettings,
}

impl ConsumerPool {
    pub fn spawn(self) -> PoolHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let workers = (0..self.settings.worker_count)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: self.queue.clone(),
                    dedup: self.dedup.clone(),
                    dispatcher: self.dispatcher.clone(),
                    sink: self.sink.clone(),
                    buffer: BatchBuffer::new(self.settings.batch_max_size, self.settings.flush_interval),
                    dedup_ttl: self.settings.dedup_ttl,
                    idle_poll: self.settings.idle_poll,
                    error_backoff: self.settings.error_backoff,
                    shutdown: shutdown_rx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        PoolHandle { shutdown_tx, workers }
    }
}

pub struct PoolHandle {
    shutdown_tx: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

impl PoolHandle {
    /// Signals every worker and waits for all of them to drain and exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

pub struct Worker {
    pub id: usize,
    pub queue: Arc<dyn PaymentQueue>,
    pub dedup: Arc<dyn DedupStore>,
    pub dispatcher: Arc<GatewayDispatcher>,
    pub sink: Arc<dyn PaymentSink>,
    pub buffer: BatchBuffer,
    pub dedup_ttl: Duration,
    pub idle_poll: Duration,
    pub error_backoff: Duration,
    pub shutdown: watch::Receiver<bool>,
}

impl Worker {
    pub async fn run(mut self) {
        tracing::info!("settlement worker {} started", self.id);

        loop {
            if *self.shutdown.borrow() {
                break;
            }
            match self.tick().await {
                Ok(true) => {}
                Ok(false) => tokio::time::sleep(self.idle_poll).await,
                Err(err) => {
                    tracing::error!("settlement worker {} iteration failed: {}", self.id, err);
                    tokio::time::sleep(self.error_backoff).await;
                }
            }
        }

        // One final flush after the last observed iteration.
        if !self.buffer.is_empty() {
            self.flush().await;
        }
        tracing::info!("settlement worker {} stopped", self.id);
    }

    /// One loop iteration: pop at most one payment, settle it, flush if due.
    /// Returns whether the queue yielded an item, so the caller can idle on
    /// an empty queue without delaying a due time-triggered flush.
    pub async fn tick(&mut self) -> Result<bool> {
        let popped = self.queue.pop().await?;
        let had_item = popped.is_some();

        if let Some(raw) = popped {
            match serde_json::from_str::<Payment>(&raw) {
                Ok(payment) => self.settle(payment).await?,
                // Unrecoverable per-item: drop it, keep the worker alive.
                Err(err) => tracing::warn!("settlement worker {} dropping undecodable entry: {}", self.id, err),
            }
        }

        if self.buffer.should_flush() {
            self.flush().await;
        }

        Ok(had_item)
    }

    async fn settle(&mut self, mut payment: Payment) -> Result<()> {
        // A failed claim call is a failed iteration, not a verdict.
        let claimed = self.dedup.try_claim(payment.correlation_id, self.dedup_ttl).await?;
        if !claimed {
            tracing::warn!("payment {} already settled, dropping", payment.correlation_id);
            return Ok(());
        }

        match self.dispatcher.dispatch(&payment).await {
            Ok(settled_by) => {
                payment.settled_by = Some(settled_by);
                self.buffer.append(payment);
            }
            Err(err) => {
                tracing::error!("payment {} could not be settled: {}", payment.correlation_id, err);
                // Free the claim so a redelivery can retry, then park the
                // payment on the dead-letter list instead of losing it.
                if let Err(release_err) = self.dedup.release(payment.correlation_id).await {
                    tracing::warn!(
                        "failed to release claim for payment {}: {}",
                        payment.correlation_id,
                        release_err
                    );
                }
                self.queue.push_dead_letter(serde_json::to_string(&payment)?).await?;
            }
        }

        Ok(())
    }

    async fn flush(&mut self) {
        let batch = self.buffer.drain();
        if batch.is_empty() {
            return;
        }
        match self.sink.write_batch(&batch).await {
            Ok(()) => tracing::info!("settlement worker {} flushed {} payments", self.id, batch.len()),
            Err(err) => {
                // The batch is already out of the buffer; losing it bounds
                // memory at the cost of the rows. Reported, not retried.
                tracing::error!(
                    "settlement worker {} dropped a batch of {}: {}",
                    self.id,
                    batch.len(),
                    err
                );
            }
        }
    }
}
