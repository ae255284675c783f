//! Device file format.
//!
//! ```toml
//! [[device]]
//! id = "desk-lamp"
//! name = "Desk Lamp"
//! manufacturer = "Acme"
//! type = "light"
//!
//! [[device.capability]]
//! name = "power"
//! kind = "switch"
//! ```

use std::path::Path;

use serde::Deserialize;

use brainhost_domain::device::{Capability, DeviceDescriptor, DeviceKind};
use brainhost_domain::error::LoadError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceFile {
    #[serde(default, rename = "device")]
    devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceEntry {
    id: String,
    name: String,
    manufacturer: String,
    #[serde(default, rename = "type")]
    kind: DeviceKind,
    driver_version: Option<u32>,
    #[serde(default, rename = "capability")]
    capabilities: Vec<Capability>,
}

/// Parse and validate the devices declared in one file.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] for malformed TOML and [`LoadError::Invalid`]
/// for a device that breaks a domain invariant.
pub fn parse(content: &str, path: &Path) -> Result<Vec<DeviceDescriptor>, LoadError> {
    let file: DeviceFile = toml::from_str(content).map_err(|err| LoadError::Parse {
        path: path.to_path_buf(),
        source: Box::new(err),
    })?;

    file.devices
        .into_iter()
        .map(|entry| {
            let device = DeviceDescriptor {
                id: entry.id,
                name: entry.name,
                manufacturer: entry.manufacturer,
                kind: entry.kind,
                driver_version: entry.driver_version,
                capabilities: entry.capabilities,
                source: Some(path.to_path_buf()),
            };
            device.validate().map_err(|source| LoadError::Invalid {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(device)
        })
        .collect()
}
