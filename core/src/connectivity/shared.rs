//! State shared between the sampler, the worker, and observers

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use super::error::Fault;
use super::state::State;
use super::status::{ConnectivityStats, ConnectivityStatus};
use super::wake::WakeEvent;
use crate::queue::TelemetryQueue;
use crate::telemetry::TelemetryBatch;

/// Everything the producer, the worker, and observers share
///
/// Construct once (usually as a `static`) and hand `&Connectivity` to the
/// sampler task, the [`ConnectivityManager`](super::ConnectivityManager), and
/// any UI/diagnostics code. The wake channel has the same depth as the queue.
/// Wakes posted while the worker is busy are discarded when it next enters
/// `Idle`, after which it only waits if the queue is still empty.
///
/// ```ignore
/// static UPLINK: Connectivity<CriticalSectionRawMutex, QUEUE_CAPACITY> = Connectivity::new();
///
/// // sampler task
/// if let Some(batch) = accumulator.push(sample) {
///     UPLINK.enqueue(batch);
/// }
/// ```
pub struct Connectivity<M: RawMutex, const C: usize> {
    queue: TelemetryQueue<M, C>,
    wake: Channel<M, WakeEvent, C>,
    status: ConnectivityStatus,
}

impl<M: RawMutex, const C: usize> Connectivity<M, C> {
    pub const fn new() -> Self {
        Self {
            queue: TelemetryQueue::new(),
            wake: Channel::new(),
            status: ConnectivityStatus::new(),
        }
    }

    /// Hand a batch to the uplink
    ///
    /// Never blocks. Returns `false` if the queue was full and the batch was
    /// dropped; the worker is only woken for accepted batches.
    pub fn enqueue(&self, batch: TelemetryBatch) -> bool {
        if !self.queue.enqueue(batch) {
            warn!(
                "Telemetry queue full, batch dropped ({} dropped so far)",
                self.queue.dropped()
            );
            return false;
        }
        self.status.count_enqueued();
        self.post(WakeEvent::DataAvailable);
        true
    }

    /// Wake the worker from a platform wake source
    ///
    /// Returns `false` if wakes are already pending.
    pub fn notify_external_wake(&self) -> bool {
        self.post(WakeEvent::External)
    }

    fn post(&self, event: WakeEvent) -> bool {
        match self.wake.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                trace!("Wake channel full, {:?} coalesced", event);
                false
            }
        }
    }

    pub(crate) async fn wait_for_wake(&self) -> WakeEvent {
        self.wake.receive().await
    }

    /// Discard pending wakes, returning how many there were
    pub(crate) fn clear_wakes(&self) -> usize {
        let mut cleared = 0;
        while self.wake.try_receive().is_ok() {
            cleared += 1;
        }
        cleared
    }

    pub(crate) fn queue(&self) -> &TelemetryQueue<M, C> {
        &self.queue
    }

    pub(crate) fn status(&self) -> &ConnectivityStatus {
        &self.status
    }

    /// True when no batches are waiting
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Batches currently waiting
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Sticky: a session has been established at least once
    pub fn has_ever_connected(&self) -> bool {
        self.status.ever_connected()
    }

    /// Sticky: the worker entered `Fatal`
    pub fn is_fatal(&self) -> bool {
        self.status.fatal()
    }

    /// The worker halted or a collaborator failure is being handled
    pub fn has_error(&self) -> bool {
        self.status.fatal() || self.status.error()
    }

    /// Last state assigned by the worker
    pub fn state(&self) -> State {
        self.status.state()
    }

    /// Origin of the most recent collaborator failure
    pub fn fault(&self) -> Option<Fault> {
        self.status.fault()
    }

    /// The worker is idle and has allowed low power
    pub fn low_power_allowed(&self) -> bool {
        self.status.low_power_allowed()
    }

    pub fn stats(&self) -> ConnectivityStats {
        self.status.stats(self.queue.dropped())
    }
}

impl<M: RawMutex, const C: usize> Default for Connectivity<M, C> {
    fn default() -> Self {
        Self::new()
    }
}
