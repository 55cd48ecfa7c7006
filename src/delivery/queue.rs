//! Unbounded FIFO handoff between intake and delivery.
//!
//! # Design Decisions
//! - No capacity bound: while the worker retries its head item the queue
//!   absorbs everything the intake produces
//! - `push` never waits; `pop` suspends until an entry arrives
//! - Depth is tracked alongside the channel for logging and metrics

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::observability::metrics;

/// The consumer side has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("delivery queue closed")]
pub struct QueueClosed;

/// Create a connected producer/consumer pair.
pub fn delivery_queue<T>() -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        QueueSender {
            tx,
            depth: depth.clone(),
        },
        QueueReceiver { rx, depth },
    )
}

/// Producer handle.
pub struct QueueSender<T> {
    tx: mpsc::UnboundedSender<T>,
    depth: Arc<AtomicUsize>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            depth: self.depth.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// Append an entry. Never blocks.
    pub fn push(&self, entry: T) -> Result<(), QueueClosed> {
        self.depth.fetch_add(1, Ordering::AcqRel);
        if self.tx.send(entry).is_err() {
            self.depth.fetch_sub(1, Ordering::AcqRel);
            return Err(QueueClosed);
        }
        metrics::record_queue_depth(self.len());
        Ok(())
    }

    /// Entries pushed but not yet popped.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer handle.
pub struct QueueReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
    depth: Arc<AtomicUsize>,
}

impl<T> QueueReceiver<T> {
    /// Wait for the next entry in push order.
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn pop(&mut self) -> Option<T> {
        let entry = self.rx.recv().await?;
        self.depth.fetch_sub(1, Ordering::AcqRel);
        metrics::record_queue_depth(self.len());
        Some(entry)
    }

    /// Entries pushed but not yet popped.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use ::metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use std::sync::atomic::AtomicU64;
    use std::time::Duration;

    /// Recorder routing every gauge to one shared cell.
    #[derive(Default)]
    struct GaugeRecorder {
        gauge: Arc<AtomicU64>,
    }

    impl GaugeRecorder {
        fn value(&self) -> f64 {
            f64::from_bits(self.gauge.load(Ordering::Acquire))
        }
    }

    impl Recorder for GaugeRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::from_arc(self.gauge.clone())
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let (tx, mut rx) = delivery_queue();
        for i in 0..100 {
            tx.push(i).unwrap();
        }
        assert_eq!(rx.len(), 100);

        for i in 0..100 {
            assert_eq!(rx.pop().await, Some(i));
        }
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_fifo_order_with_slow_producer() {
        let (tx, mut rx) = delivery_queue();
        let producer = tokio::spawn(async move {
            for i in 0..20 {
                tx.push(i).unwrap();
                if i % 3 == 0 {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            }
        });

        let mut seen = Vec::new();
        while let Some(i) = rx.pop().await {
            seen.push(i);
        }
        producer.await.unwrap();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_fifo_order_with_slow_consumer() {
        let (tx, mut rx) = delivery_queue();
        let consumer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(i) = rx.pop().await {
                tokio::time::sleep(Duration::from_millis(1)).await;
                seen.push(i);
            }
            seen
        });

        for i in 0..20 {
            tx.push(i).unwrap();
        }
        drop(tx);
        assert_eq!(consumer.await.unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_push_after_consumer_dropped() {
        let (tx, rx) = delivery_queue::<u32>();
        drop(rx);
        assert_eq!(tx.push(1), Err(QueueClosed));
        assert_eq!(tx.len(), 0);
    }

    #[tokio::test]
    async fn test_pop_waits_for_entry() {
        let (tx, mut rx) = delivery_queue();
        let waiter = tokio::spawn(async move { rx.pop().await });

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!waiter.is_finished());

        tx.push("late").unwrap();
        assert_eq!(waiter.await.unwrap(), Some("late"));
    }

    #[test]
    fn test_depth_gauge_tracks_queue_length() {
        let recorder = GaugeRecorder::default();
        let (tx, mut rx) = delivery_queue();
        let producer = tx.clone();

        ::metrics::with_local_recorder(&recorder, || {
            tx.push(1).unwrap();
            producer.push(2).unwrap();
            tx.push(3).unwrap();
            assert_eq!(recorder.value(), 3.0);

            assert_eq!(rx.pop().now_or_never(), Some(Some(1)));
            assert_eq!(recorder.value(), 2.0);

            // A push after a pop reports the depth it leaves behind.
            producer.push(4).unwrap();
            assert_eq!(recorder.value(), 3.0);

            while rx.pop().now_or_never().flatten().is_some() {}
            assert_eq!(recorder.value(), 0.0);
            assert!(rx.is_empty());
        });
    }
}
