//! Messages that wake the worker out of `Idle`

/// Wake-up reasons delivered over the worker's wake channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeEvent {
    /// The producer queued a new batch
    DataAvailable,
    /// A platform wake source fired (e.g. exit from low-power sleep on a
    /// button edge) without going through the producer
    External,
}
