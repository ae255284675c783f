//! Discovery port: locating a brain without prior configuration.

use std::future::Future;

use brainhost_domain::brain::BrainDescriptor;
use brainhost_domain::error::DiscoveryError;

/// Finds a brain on the local network.
pub trait BrainDiscovery {
    /// Resolve exactly one brain.
    ///
    /// Which brain wins when several answer, and how long to wait, is up to
    /// the implementation.
    fn discover_one_brain(
        &self,
    ) -> impl Future<Output = Result<BrainDescriptor, DiscoveryError>> + Send;
}
