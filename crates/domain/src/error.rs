//! Error types shared across the workspace.
//!
//! Each layer has its own typed error; [`BrainhostError`] is what the
//! orchestrator surfaces to the CLI. Display strings never embed their
//! source, so callers walk [`std::error::Error::source`] to render a chain.

use std::path::PathBuf;
use std::time::Duration;

/// Type-erased error produced by an adapter backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by start and stop.
#[derive(Debug, thiserror::Error)]
pub enum BrainhostError {
    /// The device loader returned an empty collection.
    #[error(
        "No devices found! Make sure you expose devices in the \"devices\" directory or install driver packages"
    )]
    NoDevicesFound,

    /// A device file could not be read, parsed, or validated.
    #[error("failed to load devices")]
    DeviceLoad(#[from] LoadError),

    /// Discovery could not resolve a brain.
    #[error("brain discovery failed")]
    BrainDiscoveryFailed(#[from] DiscoveryError),

    /// The device server refused to start.
    #[error("failed to start server")]
    ServerStartFailed(#[source] ServerError),

    /// The device server refused to stop.
    #[error("failed to stop server")]
    ServerStopFailed(#[source] ServerError),
}

/// Domain invariant violations on device descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device was declared without an id.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// A device was declared without a name.
    #[error("device {id:?} has an empty name")]
    EmptyDeviceName { id: String },

    /// A capability was declared without a name.
    #[error("device {device:?} has a capability with an empty name")]
    EmptyCapabilityName { device: String },

    /// Two capabilities of one device share a name.
    #[error("device {device:?} declares capability {capability:?} twice")]
    DuplicateCapability { device: String, capability: String },

    /// Two devices in one collection share an id.
    #[error("device id {id:?} is declared more than once")]
    DuplicateDeviceId { id: String },
}

/// Failure while loading device definitions.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a file or directory failed.
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A device file is not well-formed.
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A device file parsed but describes an invalid device.
    #[error("invalid device definition in {}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Failure while discovering a brain on the network.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Nothing answered before the timeout elapsed.
    #[error("no brain found on the network within {timeout:?}")]
    NoBrainFound { timeout: Duration },

    /// The discovery backend itself failed.
    #[error("discovery backend error")]
    Backend(#[source] BoxError),
}

/// Failure reported by the device server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A server with this name is already serving.
    #[error("server {name:?} is already running")]
    AlreadyRunning { name: String },

    /// No server with this name is serving.
    #[error("server {name:?} is not running")]
    NotRunning { name: String },

    /// The serve task ended with an error.
    #[error("server task failed")]
    Task(#[source] BoxError),
}
