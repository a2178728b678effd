//! Network link bring-up and teardown

use core::future::Future;

/// Brings the physical network link (Wi-Fi association, Ethernet PHY + DHCP,
/// cellular attach, ...) up and down.
///
/// # Example Implementation
/// ```ignore
/// struct EthLink { stack: Stack<'static> }
///
/// impl NetworkProvider for EthLink {
///     type Error = LinkError;
///
///     async fn start(&mut self) -> Result<(), LinkError> {
///         with_timeout(Duration::from_secs(30), self.stack.wait_config_up())
///             .await
///             .map_err(|_| LinkError::DhcpTimeout)
///     }
///
///     async fn stop(&mut self) -> Result<(), LinkError> {
///         Ok(())
///     }
/// }
/// ```
pub trait NetworkProvider {
    /// Error reported by a failed start or stop
    type Error: embedded_io::Error;

    /// Bring the link up. Resolves once the device has a usable address.
    fn start(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Tear the link down.
    fn stop(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}
