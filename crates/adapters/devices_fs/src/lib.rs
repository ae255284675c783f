//! # brainhost-adapter-devices-fs
//!
//! Device loader that reads TOML device files from disk.
//!
//! ## Sources
//!
//! | Location | Files read |
//! |----------|------------|
//! | `devices.directory` | every `*.toml` file directly inside |
//! | `devices.drivers_directory` | `driver.toml` of each subdirectory named `<driver_prefix>*` |
//!
//! Missing directories contribute nothing. Files are read in path order so
//! the resulting collection is stable between runs.
//!
//! ## Dependency rule
//!
//! Depends on `brainhost-app` (port traits) and `brainhost-domain` only.

pub mod config;
mod file;

use std::collections::BTreeSet;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::Instrument;

use brainhost_app::ports::DeviceLoader;
use brainhost_domain::device::{DeviceDescriptor, DeviceIdSet};
use brainhost_domain::error::LoadError;

pub use config::DevicesConfig;

/// File name a driver package exposes its devices in.
pub const DRIVER_MANIFEST: &str = "driver.toml";

/// [`DeviceLoader`] backed by the local filesystem.
pub struct FsDeviceLoader {
    config: DevicesConfig,
}

impl FsDeviceLoader {
    /// Create a loader reading from the configured directories.
    #[must_use]
    pub fn new(config: DevicesConfig) -> Self {
        Self { config }
    }

    /// Device files to read, local ones first, each group in path order.
    async fn device_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = Vec::new();

        let local: BTreeSet<PathBuf> = read_dir(&self.config.directory)
            .await?
            .into_iter()
            .filter(|(path, is_dir)| {
                !is_dir && path.extension().is_some_and(|ext| ext == "toml")
            })
            .map(|(path, _)| path)
            .collect();
        files.extend(local);

        let packages: BTreeSet<PathBuf> = read_dir(&self.config.drivers_directory)
            .await?
            .into_iter()
            .filter(|(path, is_dir)| *is_dir && self.is_driver_package(path))
            .map(|(path, _)| path)
            .collect();
        for package in packages {
            let manifest = package.join(DRIVER_MANIFEST);
            match tokio::fs::try_exists(&manifest).await {
                Ok(true) => files.push(manifest),
                Ok(false) => {
                    tracing::warn!(
                        package = %package.display(),
                        "driver package has no {DRIVER_MANIFEST}, skipping"
                    );
                }
                Err(source) => return Err(LoadError::Io { path: manifest, source }),
            }
        }

        Ok(files)
    }

    fn is_driver_package(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&self.config.driver_prefix))
    }
}

impl DeviceLoader for FsDeviceLoader {
    fn load_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceDescriptor>, LoadError>> + Send {
        let span = tracing::info_span!("load_devices", directory = %self.config.directory.display());
        async move {
            let mut devices = Vec::new();
            let mut ids = DeviceIdSet::new();

            for path in self.device_files().await? {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?;
                let parsed = file::parse(&content, &path)?;
                tracing::debug!(path = %path.display(), count = parsed.len(), "read device file");

                ids.register(&parsed)
                    .map_err(|source| LoadError::Invalid {
                        path: path.clone(),
                        source,
                    })?;
                devices.extend(parsed);
            }

            Ok(devices)
        }
        .instrument(span)
    }
}

/// List a directory as `(path, is_dir)` pairs. A missing directory is empty.
///
/// Symlinks are followed, so a linked driver package counts as a directory.
/// Dangling links are skipped with a warning.
async fn read_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>, LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "directory not found, skipping");
            return Ok(Vec::new());
        }
        Err(err) => return Err(io_err(err)),
    };

    let mut listed = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(io_err)?;
        let is_dir = if file_type.is_symlink() {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata.is_dir(),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "dangling symlink, skipping");
                    continue;
                }
                Err(source) => return Err(LoadError::Io { path, source }),
            }
        } else {
            file_type.is_dir()
        };
        listed.push((path, is_dir));
    }
    Ok(listed)
}
