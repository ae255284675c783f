//! Device directory configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Where device files and driver packages live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Directory whose `*.toml` files are device files.
    pub directory: PathBuf,
    /// Directory holding driver packages.
    pub drivers_directory: PathBuf,
    /// Name prefix a subdirectory needs to count as a driver package.
    pub driver_prefix: String,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("devices"),
            drivers_directory: PathBuf::from("drivers"),
            driver_prefix: "brainhost-driver-".to_string(),
        }
    }
}
