//! Platform-agnostic telemetry uplink logic for IoT firmware
//!
//! Sampling produces [`telemetry::TelemetryBatch`]es; the
//! [`connectivity`] state machine ships them over whatever network, clock,
//! and session providers the board supplies through `hal-abstractions`.
//! Nothing here touches hardware, so everything runs in host tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

#[macro_use]
mod fmt;

pub mod connectivity;
pub mod queue;
pub mod telemetry;
pub mod time;

pub use connectivity::{
    Connectivity, ConnectivityConfig, ConnectivityManager, Fault, Halted, Providers, State,
};
pub use queue::{TelemetryQueue, QUEUE_CAPACITY};
pub use telemetry::{BatchAccumulator, Sample, TelemetryBatch, BATCH_CAPACITY};
pub use time::Timestamp;
