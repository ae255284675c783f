//! Device: one controllable smart-home device exposed to the brain.
//!
//! Descriptors are produced by a device loader (device files, driver
//! packages). The orchestrator treats the collection as opaque apart from
//! requiring it to be non-empty; the invariants below are enforced by the
//! loader before a collection is handed over.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category the brain uses to pick an icon and default layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    #[default]
    Accessory,
    Light,
    MediaPlayer,
    Tv,
    Avreceiver,
    Dvd,
    Projector,
    Musicplayer,
    Gameconsole,
    Vod,
    Sonos,
    Hdmiswitch,
    Clima,
    Unknown,
}

/// What a capability looks like on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Button,
    Switch,
    Slider,
    Sensor,
    TextLabel,
    ImageUrl,
}

/// A single control or readout on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Stable name, unique within the device (e.g. `"power-on"`).
    pub name: String,
    /// Human-readable label; the UI falls back to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: CapabilityKind,
}

/// A device definition as loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable identifier, unique across the loaded collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Manufacturer shown on the brain.
    pub manufacturer: String,
    #[serde(default)]
    pub kind: DeviceKind,
    /// Bumped by driver authors when capabilities change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_version: Option<u32>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    /// File the descriptor was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl DeviceDescriptor {
    /// Validate invariants of a single descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id or name is empty, or if a
    /// capability name is empty or repeated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceName {
                id: self.id.clone(),
            });
        }

        let mut seen = HashSet::new();
        for capability in &self.capabilities {
            if capability.name.trim().is_empty() {
                return Err(ValidationError::EmptyCapabilityName {
                    device: self.id.clone(),
                });
            }
            if !seen.insert(capability.name.as_str()) {
                return Err(ValidationError::DuplicateCapability {
                    device: self.id.clone(),
                    capability: capability.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a capability by name.
    #[must_use]
    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.name == name)
    }
}

/// Ids already claimed while a collection is assembled from several files.
#[derive(Debug, Default)]
pub struct DeviceIdSet {
    ids: HashSet<String>,
}

impl DeviceIdSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the ids of `devices`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateDeviceId`] for the first id that
    /// was already claimed, by an earlier batch or earlier in this one.
    pub fn register(&mut self, devices: &[DeviceDescriptor]) -> Result<(), ValidationError> {
        for device in devices {
            if !self.ids.insert(device.id.clone()) {
                return Err(ValidationError::DuplicateDeviceId {
                    id: device.id.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
