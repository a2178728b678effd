//! Status shared between the worker and observers (UI, monitoring)
//!
//! Only the worker writes; anyone may read. Counters are `AtomicU32` because
//! ARMv7-M has no native 64-bit atomics.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::error::Fault;
use super::state::State;

/// Snapshot of the connectivity counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectivityStats {
    /// Batches accepted by `enqueue`
    pub enqueued: u32,
    /// Batches dropped because the queue was full
    pub dropped: u32,
    /// Batches published successfully
    pub published: u32,
    /// Passes through `RetrySession`
    pub session_retries: u32,
    /// Session-close or network-teardown calls that failed
    pub teardown_failures: u32,
    /// Times low power was allowed while idle
    pub low_power_windows: u32,
}

pub(crate) struct ConnectivityStatus {
    state: AtomicU8,
    error: AtomicBool,
    ever_connected: AtomicBool,
    fatal: AtomicBool,
    fault: AtomicU8,
    low_power_allowed: AtomicBool,
    enqueued: AtomicU32,
    published: AtomicU32,
    session_retries: AtomicU32,
    teardown_failures: AtomicU32,
    low_power_windows: AtomicU32,
}

impl ConnectivityStatus {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(State::Start as u8),
            error: AtomicBool::new(false),
            ever_connected: AtomicBool::new(false),
            fatal: AtomicBool::new(false),
            fault: AtomicU8::new(0),
            low_power_allowed: AtomicBool::new(false),
            enqueued: AtomicU32::new(0),
            published: AtomicU32::new(0),
            session_retries: AtomicU32::new(0),
            teardown_failures: AtomicU32::new(0),
            low_power_windows: AtomicU32::new(0),
        }
    }

    pub(crate) fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::Acquire)).unwrap_or(State::Start)
    }

    pub(crate) fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn error(&self) -> bool {
        self.error.load(Ordering::Acquire)
    }

    /// Raise the error flag and remember where it came from
    pub(crate) fn raise(&self, fault: Fault) {
        self.fault.store(fault.code(), Ordering::Release);
        self.error.store(true, Ordering::Release);
    }

    pub(crate) fn clear_error(&self) {
        self.error.store(false, Ordering::Release);
    }

    pub(crate) fn fault(&self) -> Option<Fault> {
        Fault::from_code(self.fault.load(Ordering::Acquire))
    }

    pub(crate) fn ever_connected(&self) -> bool {
        self.ever_connected.load(Ordering::Acquire)
    }

    /// Sticky; returns `true` the first time it is called
    pub(crate) fn mark_connected(&self) -> bool {
        !self.ever_connected.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn fatal(&self) -> bool {
        self.fatal.load(Ordering::Acquire)
    }

    /// Sticky
    pub(crate) fn mark_fatal(&self, fault: Fault) {
        self.fault.store(fault.code(), Ordering::Release);
        self.fatal.store(true, Ordering::Release);
    }

    pub(crate) fn low_power_allowed(&self) -> bool {
        self.low_power_allowed.load(Ordering::Acquire)
    }

    pub(crate) fn set_low_power_allowed(&self, allowed: bool) {
        self.low_power_allowed.store(allowed, Ordering::Release);
        if allowed {
            self.low_power_windows.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn count_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_session_retry(&self) {
        self.session_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_teardown_failure(&self) {
        self.teardown_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stats(&self, dropped: u32) -> ConnectivityStats {
        ConnectivityStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped,
            published: self.published.load(Ordering::Relaxed),
            session_retries: self.session_retries.load(Ordering::Relaxed),
            teardown_failures: self.teardown_failures.load(Ordering::Relaxed),
            low_power_windows: self.low_power_windows.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_signals() {
        let status = ConnectivityStatus::new();
        assert!(!status.ever_connected());
        assert!(status.mark_connected());
        assert!(!status.mark_connected());
        assert!(status.ever_connected());

        assert!(!status.fatal());
        status.mark_fatal(Fault::TimeSync);
        assert!(status.fatal());
        assert_eq!(status.fault(), Some(Fault::TimeSync));
    }

    #[test]
    fn test_error_flag_carries_fault() {
        let status = ConnectivityStatus::new();
        assert_eq!(status.fault(), None);
        status.raise(Fault::SessionConnect);
        assert!(status.error());
        assert_eq!(status.fault(), Some(Fault::SessionConnect));
        status.clear_error();
        assert!(!status.error());
        // The last fault stays visible for diagnostics
        assert_eq!(status.fault(), Some(Fault::SessionConnect));
    }

    #[test]
    fn test_low_power_windows_count_allows_only() {
        let status = ConnectivityStatus::new();
        status.set_low_power_allowed(true);
        status.set_low_power_allowed(false);
        status.set_low_power_allowed(true);
        assert!(status.low_power_allowed());
        assert_eq!(status.stats(0).low_power_windows, 2);
    }
}
