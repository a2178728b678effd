//! Wall-clock timestamps attached to telemetry samples

/// Timestamp with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Unix timestamp in seconds since epoch (1970-01-01 00:00:00 UTC)
    pub unix_secs: u64,
    /// Microseconds component (0-999,999)
    pub micros: u32,
}

impl Timestamp {
    /// Create a new timestamp, carrying whole seconds out of `micros`
    pub const fn new(unix_secs: u64, micros: u32) -> Self {
        Self {
            unix_secs: unix_secs.saturating_add((micros / 1_000_000) as u64),
            micros: micros % 1_000_000,
        }
    }

    /// Timestamp with a zero sub-second part
    pub const fn from_unix_secs(unix_secs: u64) -> Self {
        Self::new(unix_secs, 0)
    }
}
