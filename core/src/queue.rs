//! Bounded FIFO of telemetry batches between the sampler and the uplink worker
//!
//! Backpressure policy: when the queue is full, the *incoming* batch is
//! dropped and `enqueue` returns `false`. The producer never blocks.
//!
//! The deque lives behind an `embassy_sync` blocking mutex so the producer
//! (timer task or interrupt) and the worker can touch it from different
//! priorities. Pick `M = CriticalSectionRawMutex` for that case, or
//! `NoopRawMutex` when both sides run in one executor.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

use crate::telemetry::TelemetryBatch;

/// Default queue depth
pub const QUEUE_CAPACITY: usize = 10;

/// Bounded single-producer/single-consumer batch queue
pub struct TelemetryQueue<M: RawMutex, const C: usize> {
    inner: Mutex<M, RefCell<Deque<TelemetryBatch, C>>>,
    dropped: AtomicU32,
}

impl<M: RawMutex, const C: usize> TelemetryQueue<M, C> {
    /// Create an empty queue. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Append `batch`, or drop it and return `false` if the queue is full
    pub fn enqueue(&self, batch: TelemetryBatch) -> bool {
        let accepted = self
            .inner
            .lock(|q| q.borrow_mut().push_back(batch).is_ok());
        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Remove and return the oldest batch
    pub fn dequeue(&self) -> Option<TelemetryBatch> {
        self.inner.lock(|q| q.borrow_mut().pop_front())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock(|q| q.borrow().is_empty())
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock(|q| q.borrow().is_full())
    }

    /// Number of queued batches, always within `0..=C`
    pub fn len(&self) -> usize {
        self.inner.lock(|q| q.borrow().len())
    }

    pub const fn capacity(&self) -> usize {
        C
    }

    /// Batches discarded because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<M: RawMutex, const C: usize> Default for TelemetryQueue<M, C> {
    fn default() -> Self {
        Self::new()
    }
}
