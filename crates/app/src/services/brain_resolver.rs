//! Brain resolver: decides where the brain lives.
//!
//! Resolution is layered, first match wins:
//!
//! 1. an explicit, non-empty `brain_host` option
//! 2. the `BRAINIP` environment override
//! 3. network discovery
//!
//! The first two never touch the network.

use brainhost_domain::brain::BrainDescriptor;
use brainhost_domain::error::DiscoveryError;

use crate::ports::BrainDiscovery;
use crate::services::lifecycle::StartOptions;

/// Environment variable holding a brain host that suppresses discovery.
pub const BRAIN_HOST_ENV: &str = "BRAINIP";

/// Resolves a [`BrainDescriptor`] from options, override, or discovery.
pub struct BrainResolver<D> {
    discovery: D,
    env_override: Option<String>,
}

impl<D: BrainDiscovery> BrainResolver<D> {
    /// Create a resolver with no environment override.
    pub fn new(discovery: D) -> Self {
        Self {
            discovery,
            env_override: None,
        }
    }

    /// Create a resolver that reads the override from [`BRAIN_HOST_ENV`].
    pub fn from_env(discovery: D) -> Self {
        Self::new(discovery).with_env_override(std::env::var(BRAIN_HOST_ENV).ok())
    }

    /// Set the environment-level host override. Empty strings are ignored.
    #[must_use]
    pub fn with_env_override(mut self, host: Option<String>) -> Self {
        self.env_override = host.filter(|h| !h.is_empty());
        self
    }

    /// Build a descriptor from configuration alone, if configuration names a host.
    #[must_use]
    pub fn configured_brain(&self, options: &StartOptions) -> Option<BrainDescriptor> {
        let host = options
            .brain_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .or(self.env_override.as_deref())?;
        Some(BrainDescriptor::from_host(host, options.brain_port))
    }

    /// Resolve the brain, falling back to discovery.
    ///
    /// # Errors
    ///
    /// Returns the discovery error unchanged when no host is configured and
    /// discovery fails.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, options: &StartOptions) -> Result<BrainDescriptor, DiscoveryError> {
        if let Some(brain) = self.configured_brain(options) {
            tracing::debug!(host = %brain.host, port = brain.port, "using configured brain");
            return Ok(brain);
        }

        tracing::info!("no brain address configured, attempting to discover one");
        let brain = self.discovery.discover_one_brain().await?;
        tracing::info!(brain = brain.display_name(), host = %brain.host, "brain discovered");
        Ok(brain)
    }
}
