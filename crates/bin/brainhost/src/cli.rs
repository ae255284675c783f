//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "brainhost")]
#[command(about = "Expose local device definitions to a Brain on your network")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load devices, find the Brain, and serve until interrupted
    Start(StartArgs),
    /// Load and validate devices, then print them
    Devices(ConfigArgs),
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Configuration file (defaults to `brainhost.toml` if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding device files
    #[arg(long, value_name = "DIR")]
    pub devices_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct StartArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Port the device server listens on [default: 6336]
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Name of the device server [default: default]
    #[arg(long, value_name = "NAME")]
    pub server_name: Option<String>,

    /// Brain host; skips discovery when set
    #[arg(long, value_name = "HOST")]
    pub brain_host: Option<String>,

    /// Brain API port [default: 3000]
    #[arg(long, value_name = "PORT")]
    pub brain_port: Option<u16>,
}
