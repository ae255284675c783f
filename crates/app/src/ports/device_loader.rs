//! Device loader port: where device definitions come from.

use std::future::Future;

use brainhost_domain::device::DeviceDescriptor;
use brainhost_domain::error::LoadError;

/// Supplies the devices to expose.
///
/// An empty collection is a valid return value here; deciding that it is
/// fatal belongs to the orchestrator.
pub trait DeviceLoader {
    /// Load every available device definition.
    fn load_devices(&self) -> impl Future<Output = Result<Vec<DeviceDescriptor>, LoadError>> + Send;
}
