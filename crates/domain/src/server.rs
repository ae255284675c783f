//! Server configuration: everything the device server needs to start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brain::BrainDescriptor;
use crate::device::DeviceDescriptor;

/// Port the device server listens on when none is configured.
pub const DEFAULT_SERVER_PORT: u16 = 6336;

/// Server name used when none is configured.
pub const DEFAULT_SERVER_NAME: &str = "default";

/// Interface the device server binds to when none is configured.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// UTC timestamp recorded when a server session starts.
pub type Timestamp = DateTime<Utc>;

/// Configuration handed to the device server on start and stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfiguration {
    pub brain: BrainDescriptor,
    pub port: u16,
    pub name: String,
    /// Local interface to listen on. Not part of brain resolution.
    pub bind_host: String,
    pub devices: Vec<DeviceDescriptor>,
}

impl ServerConfiguration {
    /// Assemble a configuration, applying defaults.
    ///
    /// A zero port or an empty name counts as unspecified.
    #[must_use]
    pub fn assemble(
        brain: BrainDescriptor,
        devices: Vec<DeviceDescriptor>,
        port: Option<u16>,
        name: Option<&str>,
    ) -> Self {
        Self {
            brain,
            port: port.filter(|p| *p != 0).unwrap_or(DEFAULT_SERVER_PORT),
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_SERVER_NAME)
                .to_string(),
            bind_host: DEFAULT_BIND_HOST.to_string(),
            devices,
        }
    }

    /// Override the bind interface.
    #[must_use]
    pub fn with_bind_host(mut self, bind_host: impl Into<String>) -> Self {
        self.bind_host = bind_host.into();
        self
    }

    /// Return the `host:port` listen address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

/// Proof that a device server was started.
///
/// Returned by a successful start and consumed by stop, so a server can
/// only be stopped once and only after it started. Not `Clone`.
#[derive(Debug)]
pub struct ServerSession {
    configuration: ServerConfiguration,
    started_at: Timestamp,
}

impl ServerSession {
    /// Record a freshly started server.
    #[must_use]
    pub fn new(configuration: ServerConfiguration) -> Self {
        Self {
            configuration,
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &ServerConfiguration {
        &self.configuration
    }

    #[must_use]
    pub fn brain(&self) -> &BrainDescriptor {
        &self.configuration.brain
    }

    #[must_use]
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Give up the session, returning the configuration it was started with.
    #[must_use]
    pub fn into_configuration(self) -> ServerConfiguration {
        self.configuration
    }
}
