//! # brainhost: device bootstrapper CLI
//!
//! Composition root that wires all adapters together and drives the
//! orchestrator.
//!
//! ## Responsibilities
//! - Parse CLI flags and load configuration (file, env vars, flags)
//! - Initialise `tracing` logging
//! - Construct the device loader, brain discovery, and device server adapters
//! - Start the device server, wait for Ctrl-C or SIGTERM, stop it
//! - Turn any error into one `ERROR:` line on stderr and exit status 1
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod cli;
mod config;

use std::error::Error;
use std::future::Future;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use brainhost_adapter_devices_fs::FsDeviceLoader;
use brainhost_adapter_http_axum::AxumDeviceServer;
use brainhost_adapter_mdns::MdnsBrainDiscovery;
use brainhost_app::ports::DeviceLoader;
use brainhost_app::services::brain_resolver::BrainResolver;
use brainhost_app::services::lifecycle::Orchestrator;
use brainhost_domain::error::BrainhostError;

use crate::cli::{Cli, Command, ConfigArgs, StartArgs};
use crate::config::{Config, ConfigError, LoggingConfig};

/// Errors that end the process.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Brainhost(#[from] BrainhostError),
    #[error("failed to install shutdown signal handler")]
    Signal(#[source] std::io::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Start(args) => start(args).await,
        Command::Devices(args) => list_devices(args).await,
    };

    if let Err(err) = result {
        eprintln!("ERROR: {}", error_chain(&err));
        std::process::exit(1);
    }
}

async fn start(args: StartArgs) -> Result<(), CliError> {
    let config = Config::load_for_start(&args)?;
    init_logging(&config.logging);

    let orchestrator = Orchestrator::new(
        FsDeviceLoader::new(config.devices.clone()),
        BrainResolver::from_env(MdnsBrainDiscovery::new(config.discovery.clone())),
        AxumDeviceServer::new(),
    );

    let shutdown = shutdown_signal()?;
    let session = orchestrator.start(&config.start_options()).await?;
    let brain = session.brain();
    println!(
        "- Server started, connected to Brain: {} ({}:{})",
        brain.display_name(),
        brain.host,
        brain.port
    );
    println!("# Your devices are now ready to use!");

    shutdown.await;
    orchestrator.stop(session).await?;
    Ok(())
}

async fn list_devices(args: ConfigArgs) -> Result<(), CliError> {
    let config = Config::load(&args)?;
    init_logging(&config.logging);

    let devices = FsDeviceLoader::new(config.devices)
        .load_devices()
        .await
        .map_err(BrainhostError::from)?;
    if devices.is_empty() {
        return Err(BrainhostError::NoDevicesFound.into());
    }

    for device in devices {
        let source = device
            .source
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{} capabilities\t{source}",
            device.id,
            device.name,
            device.manufacturer,
            device.capabilities.len()
        );
    }
    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
///
/// Handlers are installed on call, so a signal arriving before the
/// returned future is awaited is not lost.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>, CliError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).map_err(CliError::Signal)?;
    let mut sigint = signal(SignalKind::interrupt()).map_err(CliError::Signal)?;
    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        }
    })
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>, CliError> {
    Ok(async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C, shutting down");
        }
    })
}

fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.filter))
        .with_writer(std::io::stderr)
        .init();
}

/// Render an error and its sources on one line, joined by `: `.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
