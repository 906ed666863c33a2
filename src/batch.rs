use crate::domain::payment::Payment;
use std::time::{Duration, Instant};

/// Per-worker accumulator of settled payments. Never shared across workers,
/// so the batch preserves the settlement order on its owning worker.
pub struct BatchBuffer {
    items: Vec<Payment>,
    last_flush: Instant,
    max_size: usize,
    max_age: Duration,
}

impl BatchBuffer {
    pub fn new(max_size: usize, max_age: Duration) -> Self {
        Self {
            items: Vec::with_capacity(max_size),
            last_flush: Instant::now(),
            max_size,
            max_age,
        }
    }

    pub fn append(&mut self, payment: Payment) {
        self.items.push(payment);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once the size threshold is reached or the buffer has gone
    /// unflushed past its age bound, whichever comes first. An empty buffer
    /// is never due.
    pub fn should_flush(&self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.len() >= self.max_size || self.last_flush.elapsed() >= self.max_age
    }

    /// Takes the current contents and resets the flush timer. Callers hand
    /// the returned batch to the sink; the buffer is already empty, so a
    /// failed write can never grow it.
    pub fn drain(&mut self) -> Vec<Payment> {
        self.last_flush = Instant::now();
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::SettledBy;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn settled_payment() -> Payment {
        Payment {
            correlation_id: Uuid::new_v4(),
            amount: dec!(10.00),
            requested_at: Utc::now(),
            settled_by: Some(SettledBy::Default),
        }
    }

    #[test]
    fn size_threshold_trips_on_the_nth_item() {
        let mut buffer = BatchBuffer::new(100, Duration::from_secs(60));
        for _ in 0..99 {
            buffer.append(settled_payment());
        }
        assert!(!buffer.should_flush());

        buffer.append(settled_payment());
        assert!(buffer.should_flush());
        assert_eq!(buffer.drain().len(), 100);
        assert!(buffer.is_empty());
    }

    #[test]
    fn age_threshold_trips_without_new_items() {
        let mut buffer = BatchBuffer::new(100, Duration::from_millis(50));
        buffer.append(settled_payment());
        assert!(!buffer.should_flush());

        std::thread::sleep(Duration::from_millis(60));
        assert!(buffer.should_flush());
    }

    #[test]
    fn empty_buffer_is_never_due() {
        let buffer = BatchBuffer::new(100, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(!buffer.should_flush());
    }

    #[test]
    fn drain_resets_the_timer() {
        let mut buffer = BatchBuffer::new(100, Duration::from_millis(50));
        buffer.append(settled_payment());
        std::thread::sleep(Duration::from_millis(60));
        assert!(buffer.should_flush());

        buffer.drain();
        buffer.append(settled_payment());
        assert!(!buffer.should_flush());
    }

    #[test]
    fn drain_preserves_append_order() {
        let mut buffer = BatchBuffer::new(10, Duration::from_secs(60));
        let first = settled_payment();
        let second = settled_payment();
        buffer.append(first.clone());
        buffer.append(second.clone());

        let batch = buffer.drain();
        assert_eq!(batch[0].correlation_id, first.correlation_id);
        assert_eq!(batch[1].correlation_id, second.correlation_id);
    }
}
