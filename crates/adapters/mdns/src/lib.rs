//! # brainhost-adapter-mdns
//!
//! Brain discovery over multicast DNS (DNS-SD).
//!
//! Browses for the configured service type and takes the first service that
//! resolves. The daemon lives only for the duration of one discovery call.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `brainhost-app` and `brainhost-domain`.

pub mod config;

use std::future::Future;
use std::net::IpAddr;

use mdns_sd::{ServiceDaemon, ServiceEvent};
use tracing::Instrument;

use brainhost_app::ports::BrainDiscovery;
use brainhost_domain::brain::BrainDescriptor;
use brainhost_domain::error::DiscoveryError;

pub use config::DiscoveryConfig;

/// TXT property carrying the brain's advertised hostname.
const NAME_PROPERTY: &str = "hon";

/// [`BrainDiscovery`] backed by an `mdns-sd` service browser.
pub struct MdnsBrainDiscovery {
    config: DiscoveryConfig,
}

impl MdnsBrainDiscovery {
    #[must_use]
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }
}

impl BrainDiscovery for MdnsBrainDiscovery {
    fn discover_one_brain(
        &self,
    ) -> impl Future<Output = Result<BrainDescriptor, DiscoveryError>> + Send {
        let span = tracing::info_span!("discover_one_brain", service_type = %self.config.service_type);
        async move {
            let timeout = self.config.timeout();
            let daemon = DaemonGuard::start()?;
            let receiver = daemon
                .0
                .browse(&self.config.service_type)
                .map_err(|err| DiscoveryError::Backend(Box::new(err)))?;

            let outcome = tokio::time::timeout(timeout, async {
                while let Ok(event) = receiver.recv_async().await {
                    if let ServiceEvent::ServiceResolved(info) = event {
                        tracing::debug!(fullname = info.get_fullname(), "service resolved");
                        return Some(brain_from_service(
                            info.get_fullname(),
                            &self.config.service_type,
                            info.get_hostname(),
                            info.get_addresses().iter().copied(),
                            info.get_port(),
                            info.get_property_val_str(NAME_PROPERTY),
                        ));
                    }
                }
                None
            })
            .await;

            match outcome {
                Ok(Some(brain)) => Ok(brain),
                Ok(None) => Err(DiscoveryError::Backend(
                    "mdns browse channel closed before a brain resolved".into(),
                )),
                Err(_) => Err(DiscoveryError::NoBrainFound { timeout }),
            }
        }
        .instrument(span)
    }
}

/// Owns the mdns daemon for one discovery call and shuts it down on drop.
struct DaemonGuard(ServiceDaemon);

impl DaemonGuard {
    fn start() -> Result<Self, DiscoveryError> {
        ServiceDaemon::new()
            .map(Self)
            .map_err(|err| DiscoveryError::Backend(Box::new(err)))
    }
}

impl Drop for DaemonGuard {
    fn drop(&mut self) {
        if let Err(err) = self.0.shutdown() {
            tracing::debug!(error = %err, "mdns daemon shutdown failed");
        }
    }
}

/// Turn a resolved DNS-SD service into a [`BrainDescriptor`].
///
/// Prefers the lowest IPv4 address, then any address, then the hostname.
/// The name comes from the TXT record, else the instance label.
fn brain_from_service(
    fullname: &str,
    service_type: &str,
    hostname: &str,
    addresses: impl IntoIterator<Item = IpAddr>,
    port: u16,
    advertised_name: Option<&str>,
) -> BrainDescriptor {
    let addresses: Vec<IpAddr> = addresses.into_iter().collect();
    let host = addresses
        .iter()
        .filter(|addr| addr.is_ipv4())
        .min()
        .or_else(|| addresses.iter().min())
        .map_or_else(|| hostname.trim_end_matches('.').to_string(), ToString::to_string);

    let instance = fullname
        .strip_suffix(service_type)
        .map(|label| label.trim_end_matches('.'))
        .or_else(|| fullname.split('.').next())
        .unwrap_or(fullname);
    let name = advertised_name
        .filter(|n| !n.is_empty())
        .unwrap_or(instance)
        .to_string();

    BrainDescriptor {
        host,
        port,
        name: Some(name),
    }
}
