//! Clap derive structures for the `aeromon` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aeromon -- poll a Nettigo Air Monitor from the command line
#[derive(Debug, Parser)]
#[command(
    name = "aeromon",
    version,
    about = "Read air-quality sensors from a Nettigo Air Monitor device",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device host (hostname or IP, no scheme)
    #[arg(long, short = 'H', env = "AEROMON_HOST", global = true)]
    pub host: Option<String>,

    /// Stable device id override (skips the MAC lookup)
    #[arg(long, env = "AEROMON_UNIQUE_ID", global = true)]
    pub unique_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "AEROMON_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AEROMON_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show device info from one poll (firmware, boot time, signal)
    Status,

    /// Print the device's MAC address
    Mac,

    /// Poll once and list all sensor entities with their values
    Sensors,

    /// Poll on an interval and print every refresh until interrupted
    Watch {
        /// Poll period, e.g. "30s" or "5m"
        #[arg(long, short = 'i', default_value = "5m", value_parser = humantime::parse_duration)]
        interval: std::time::Duration,
    },
}
