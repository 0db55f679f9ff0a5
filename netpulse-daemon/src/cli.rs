//! CLI argument definitions for netpulse-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Netpulse network-monitoring daemon.
///
/// Drives the synthetic traffic pipeline (packet generation, bounded
/// buffering, statistics, interface throughput) and serves consistent
/// snapshots, filtered views, and threat alerts to consumers.
#[derive(Parser, Debug)]
#[command(name = "netpulse-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to netpulse.toml configuration file.
    ///
    /// Falls back to built-in defaults when the file does not exist.
    #[arg(short, long, default_value = "/etc/netpulse/netpulse.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting capture.
    #[arg(long)]
    pub validate: bool,

    /// Write the filtered view into the data directory on shutdown.
    #[arg(long)]
    pub export_on_exit: bool,
}
