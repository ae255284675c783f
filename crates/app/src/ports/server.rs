//! Device server port: the process that exposes devices to the brain.

use std::future::Future;

use brainhost_domain::error::ServerError;
use brainhost_domain::server::ServerConfiguration;

/// Hosts the configured devices.
///
/// Start is assumed atomic: on `Ok` the server is serving, on `Err` nothing
/// is left behind.
pub trait DeviceServer {
    /// Start serving `config.devices` on `config.port`.
    fn start(
        &self,
        config: &ServerConfiguration,
    ) -> impl Future<Output = Result<(), ServerError>> + Send;

    /// Stop the server previously started with `config`.
    fn stop(
        &self,
        config: &ServerConfiguration,
    ) -> impl Future<Output = Result<(), ServerError>> + Send;
}
