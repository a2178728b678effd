//! Wall-clock synchronization

use core::future::Future;

/// Synchronizes the device clock (typically SNTP into the RTC).
///
/// The manager calls [`sync`](TimeSyncProvider::sync) at most once per boot,
/// right after the first successful network bring-up. Implementors own any
/// server fallback or per-server retry policy.
pub trait TimeSyncProvider {
    /// Error reported when no time source could be reached
    type Error: embedded_io::Error;

    /// Perform one synchronization.
    fn sync(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}
