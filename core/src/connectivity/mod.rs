//! Connectivity and session management for the telemetry uplink
//!
//! A producer (the sampler task) hands [`TelemetryBatch`](crate::telemetry::TelemetryBatch)es
//! to a [`Connectivity`] via [`Connectivity::enqueue`]. A single worker task
//! owns the [`ConnectivityManager`], which brings the network up when there is
//! work, opens one session, drains the queue, tears everything down, and then
//! idles with low power allowed until the next batch arrives.
//!
//! ```text
//! Start -> ConnectNetwork -> [SyncTime] -> ConnectSession -> Ready <-> Publish
//!                                              ^    |          |
//!                                              |    v          v
//!                                        RetrySession     CloseSession
//!                                                              |
//!            ConnectNetwork <- (queue not empty) Idle <- DisconnectNetwork
//! ```
//!
//! Failures bringing up the network, syncing time, or publishing are
//! terminal (`Fatal`). Session-connect failures are retried.

mod config;
mod error;
mod manager;
mod power;
mod shared;
mod state;
mod status;
mod wake;

#[cfg(test)]
mod mock;

pub use config::ConnectivityConfig;
pub use error::{Fault, Halted};
pub use manager::{ConnectivityManager, Providers};
pub use power::PowerHintCoordinator;
pub use shared::Connectivity;
pub use state::{transition, State, TransitionInputs};
pub use status::ConnectivityStats;
pub use wake::WakeEvent;
