//! Scripted collaborators for driving the manager in tests

use std::cell::RefCell;
use std::rc::Rc;

use hal_abstractions::{NetworkProvider, PowerHintSink, SessionProvider, TimeSyncProvider};

use crate::telemetry::{Sample, TelemetryBatch};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    NetworkStart,
    NetworkStop,
    TimeSync,
    Connect,
    /// Tag of the published batch (first sample's seconds)
    Publish(u64),
    Close,
    AllowLowPower,
    DisallowLowPower,
}

impl Call {
    fn is_power_hint(self) -> bool {
        matches!(self, Call::AllowLowPower | Call::DisallowLowPower)
    }
}

#[derive(Clone, Default)]
pub(crate) struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Calls other than power hints
    pub(crate) fn io_calls(&self) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .copied()
            .filter(|c| !c.is_power_hint())
            .collect()
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.0.borrow().iter().filter(|&&c| c == call).count()
    }

    pub(crate) fn published(&self) -> Vec<u64> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Publish(tag) => Some(*tag),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError;

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "scripted failure")
    }
}

impl core::error::Error for MockError {}

impl embedded_io::Error for MockError {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// Consume one scripted failure
fn take_failure(remaining: &mut u32) -> bool {
    if *remaining == 0 {
        return false;
    }
    *remaining -= 1;
    true
}

pub(crate) struct MockNetwork {
    log: CallLog,
    pub(crate) fail_starts: u32,
    pub(crate) fail_stop: bool,
}

impl NetworkProvider for MockNetwork {
    type Error = MockError;

    async fn start(&mut self) -> Result<(), MockError> {
        self.log.push(Call::NetworkStart);
        if take_failure(&mut self.fail_starts) {
            return Err(MockError);
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), MockError> {
        self.log.push(Call::NetworkStop);
        if self.fail_stop {
            return Err(MockError);
        }
        Ok(())
    }
}

pub(crate) struct MockClock {
    log: CallLog,
    pub(crate) fail: bool,
}

impl TimeSyncProvider for MockClock {
    type Error = MockError;

    async fn sync(&mut self) -> Result<(), MockError> {
        self.log.push(Call::TimeSync);
        if self.fail {
            return Err(MockError);
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MockSession {
    pub(crate) id: u32,
}

pub(crate) struct MockSessions {
    log: CallLog,
    pub(crate) fail_connects: u32,
    /// Zero-based index of the publish call that fails
    pub(crate) fail_publish_at: Option<usize>,
    pub(crate) fail_close: bool,
    publishes: usize,
    opened: u32,
    live: u32,
}

impl MockSessions {
    pub(crate) fn live(&self) -> u32 {
        self.live
    }
}

impl SessionProvider<TelemetryBatch> for MockSessions {
    type Session = MockSession;
    type Error = MockError;

    async fn connect(&mut self) -> Result<MockSession, MockError> {
        self.log.push(Call::Connect);
        if take_failure(&mut self.fail_connects) {
            return Err(MockError);
        }
        assert_eq!(self.live, 0, "second session opened while one is live");
        self.opened += 1;
        self.live += 1;
        Ok(MockSession { id: self.opened })
    }

    async fn publish(
        &mut self,
        session: &mut MockSession,
        payload: TelemetryBatch,
    ) -> Result<(), MockError> {
        assert_eq!(session.id, self.opened, "publish on a stale session");
        let tag = payload.first_timestamp().map_or(0, |t| t.unix_secs);
        self.log.push(Call::Publish(tag));

        let index = self.publishes;
        self.publishes += 1;
        if self.fail_publish_at == Some(index) {
            return Err(MockError);
        }
        Ok(())
    }

    async fn close(&mut self, session: MockSession) -> Result<(), MockError> {
        assert_eq!(session.id, self.opened, "closing a stale session");
        self.log.push(Call::Close);
        self.live -= 1;
        if self.fail_close {
            return Err(MockError);
        }
        Ok(())
    }
}

pub(crate) struct MockPower {
    log: CallLog,
}

impl PowerHintSink for MockPower {
    fn allow_low_power(&mut self) {
        self.log.push(Call::AllowLowPower);
    }

    fn disallow_low_power(&mut self) {
        self.log.push(Call::DisallowLowPower);
    }
}

/// A full set of collaborators sharing one call log
pub(crate) struct Mocks {
    pub(crate) log: CallLog,
    pub(crate) network: MockNetwork,
    pub(crate) time: MockClock,
    pub(crate) sessions: MockSessions,
    pub(crate) power: MockPower,
}

impl Mocks {
    pub(crate) fn new() -> Self {
        let log = CallLog::default();
        Self {
            network: MockNetwork {
                log: log.clone(),
                fail_starts: 0,
                fail_stop: false,
            },
            time: MockClock {
                log: log.clone(),
                fail: false,
            },
            sessions: MockSessions {
                log: log.clone(),
                fail_connects: 0,
                fail_publish_at: None,
                fail_close: false,
                publishes: 0,
                opened: 0,
                live: 0,
            },
            power: MockPower { log: log.clone() },
            log,
        }
    }
}

/// One-sample batch tagged by its timestamp seconds
pub(crate) fn tagged_batch(tag: u64) -> TelemetryBatch {
    let mut batch = TelemetryBatch::new();
    let _ = batch.push(Sample::new(Timestamp::from_unix_secs(tag), 20.5));
    batch
}
