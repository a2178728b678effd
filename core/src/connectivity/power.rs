//! Power-hint coordination for the idle wait
//!
//! Low power is only allowed while the worker is parked in `Idle` waiting
//! for telemetry. Every other state needs the core awake for network I/O.

use hal_abstractions::PowerHintSink;

use super::status::ConnectivityStatus;

/// Keeps [`PowerHintSink`] calls balanced and mirrored into the shared status
pub struct PowerHintCoordinator<P> {
    sink: P,
    allowed: bool,
}

impl<P: PowerHintSink> PowerHintCoordinator<P> {
    /// Wrap a sink that currently disallows low power
    pub fn new(sink: P) -> Self {
        Self {
            sink,
            allowed: false,
        }
    }

    pub(crate) fn allow(&mut self, status: &ConnectivityStatus) {
        if self.allowed {
            return;
        }
        self.sink.allow_low_power();
        self.allowed = true;
        status.set_low_power_allowed(true);
        trace!("Low power allowed");
    }

    pub(crate) fn disallow(&mut self, status: &ConnectivityStatus) {
        if !self.allowed {
            return;
        }
        self.sink.disallow_low_power();
        self.allowed = false;
        status.set_low_power_allowed(false);
        trace!("Low power disallowed");
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }
}
