//! Configuration loading: TOML file, environment overrides, then CLI flags.
//!
//! Looks for `brainhost.toml` in the working directory unless `--config`
//! names a file. Every field has a default or is optional, so the file is
//! optional. Later layers win: file < `BRAINHOST_*` variables < flags.
//!
//! `BRAINIP` is not read here. It belongs to the brain resolver and ranks
//! below an explicitly configured brain host.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use brainhost_adapter_devices_fs::DevicesConfig;
use brainhost_adapter_mdns::DiscoveryConfig;
use brainhost_app::services::lifecycle::StartOptions;
use brainhost_domain::server::DEFAULT_BIND_HOST;

use crate::cli::{ConfigArgs, StartArgs};

/// File read when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "brainhost.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device server settings.
    pub server: ServerConfig,
    /// Explicit brain address.
    pub brain: BrainConfig,
    /// Brain discovery settings.
    pub discovery: DiscoveryConfig,
    /// Device directories.
    pub devices: DevicesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Device server configuration. Unset fields fall back to domain defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub name: Option<String>,
    /// Interface to bind to (e.g. `0.0.0.0`).
    pub bind_host: String,
}

/// Brain address; leaving `host` unset enables discovery.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load the file layer and environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicitly named file
    /// cannot be read, or if validation fails.
    pub fn load(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_required_file(path)?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.apply_config_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Load every layer including the `start` flags.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_for_start(args: &StartArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(&args.config)?;
        config.apply_start_args(args);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn from_required_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("BRAINHOST_SERVER_PORT") {
            self.server.port = Some(parse_port("BRAINHOST_SERVER_PORT", &val)?);
        }
        if let Some(val) = lookup("BRAINHOST_SERVER_NAME") {
            self.server.name = Some(val);
        }
        if let Some(val) = lookup("BRAINHOST_BIND_HOST") {
            self.server.bind_host = val;
        }
        if let Some(val) = lookup("BRAINHOST_BRAIN_HOST") {
            self.brain.host = Some(val);
        }
        if let Some(val) = lookup("BRAINHOST_BRAIN_PORT") {
            self.brain.port = Some(parse_port("BRAINHOST_BRAIN_PORT", &val)?);
        }
        if let Some(val) = lookup("BRAINHOST_DEVICES_DIR") {
            self.devices.directory = PathBuf::from(val);
        }
        if let Some(val) = lookup("BRAINHOST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn apply_config_args(&mut self, args: &ConfigArgs) {
        if let Some(dir) = &args.devices_dir {
            self.devices.directory.clone_from(dir);
        }
    }

    fn apply_start_args(&mut self, args: &StartArgs) {
        if args.server_port.is_some() {
            self.server.port = args.server_port;
        }
        if args.server_name.is_some() {
            self.server.name.clone_from(&args.server_name);
        }
        if args.brain_host.is_some() {
            self.brain.host.clone_from(&args.brain_host);
        }
        if args.brain_port.is_some() {
            self.brain.port = args.brain_port;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "discovery timeout must be non-zero".to_string(),
            ));
        }
        if self.discovery.service_type.is_empty() {
            return Err(ConfigError::Validation(
                "discovery service type must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Options for the orchestrator's start call.
    #[must_use]
    pub fn start_options(&self) -> StartOptions {
        StartOptions {
            server_port: self.server.port,
            server_name: self.server.name.clone(),
            brain_host: self.brain.host.clone(),
            brain_port: self.brain.port,
            bind_host: Some(self.server.bind_host.clone()),
        }
    }
}

fn parse_port(key: &str, val: &str) -> Result<u16, ConfigError> {
    val.parse()
        .map_err(|_| ConfigError::Validation(format!("{key} must be a port number, got {val:?}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: None,
            name: None,
            bind_host: DEFAULT_BIND_HOST.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "brainhost=info,tower_http=warn,mdns_sd=warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
