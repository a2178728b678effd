//! Low-power mode hints

/// Sink for hints to the platform power manager.
///
/// The platform starts with low power disallowed. Calls arrive strictly
/// alternating (`allow`, `disallow`, `allow`, ...) so implementations backed
/// by reference-counted constraints may map them directly onto
/// release/set operations.
pub trait PowerHintSink {
    /// The processor may enter its low-power idle mode.
    fn allow_low_power(&mut self);

    /// The processor must stay responsive.
    fn disallow_low_power(&mut self);
}
