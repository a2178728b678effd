//! Connectivity manager configuration

/// Connectivity manager configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectivityConfig {
    /// Run the one-time clock sync after the first network bring-up
    pub sync_time_on_boot: bool,
    /// Consecutive session-connect retries before escalating to `Fatal`
    ///
    /// `None` retries forever with no backoff.
    pub session_retry_limit: Option<u32>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            sync_time_on_boot: true,
            session_retry_limit: None,
        }
    }
}
