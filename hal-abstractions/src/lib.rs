//! Hardware abstraction traits for telemetry uplink firmware
//!
//! This crate defines the capabilities the connectivity manager consumes.
//! BSPs implement these traits; the manager in `uplink-core` only ever sees
//! the traits, never the network stack, RTC, or power driver behind them.
//!
//! All fallible operations are async and report errors that implement
//! [`embedded_io::Error`], so callers can log an [`embedded_io::ErrorKind`]
//! without knowing the concrete error type.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod network;
pub mod power;
pub mod session;
pub mod time;

pub use network::NetworkProvider;
pub use power::PowerHintSink;
pub use session::SessionProvider;
pub use time::TimeSyncProvider;
