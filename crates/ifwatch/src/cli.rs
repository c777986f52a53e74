//! Clap derive structures for the `ifwatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ifwatch -- interface error rates, utilization, and rate series
#[derive(Debug, Parser)]
#[command(
    name = "ifwatch",
    version,
    about = "Rank network interfaces by error rate and utilization",
    long_about = "Derives rates from cumulative interface counters collected by a\n\
        telemetry sample service (or loaded from a JSON snapshot), ranks the\n\
        worst interfaces, and prints per-second rate series for charting.",
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
    /// Sample service profile to use
    #[arg(long, short = 'p', env = "IFWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Sample service URL (overrides profile)
    #[arg(long, short = 'u', env = "IFWATCH_STORE_URL", global = true)]
    pub store_url: Option<String>,

    /// Sample service API key
    #[arg(long, env = "IFWATCH_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Read samples from a JSON snapshot instead of the sample service
    #[arg(long, env = "IFWATCH_SNAPSHOT", global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IFWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "IFWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IFWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interfaces with the highest average error rate
    #[command(alias = "err")]
    Errors(RankArgs),

    /// Interfaces with the highest current utilization
    #[command(alias = "util")]
    Utilization(RankArgs),

    /// Per-second rate series of one interface
    Series(SeriesArgs),

    /// List polled devices
    #[command(alias = "dev")]
    Devices,

    /// List and search interfaces with their latest status
    #[command(alias = "ifs")]
    Interfaces(InterfacesArgs),

    /// Show one interface with its transceiver module and limits
    #[command(alias = "if")]
    Interface(InterfaceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Rankings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Max entries to show (defaults to the configured top-N)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Evaluate the recency window as of this instant (RFC3339 or Unix seconds)
    #[arg(long, value_name = "TIME")]
    pub as_of: Option<String>,
}

// ── Series ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Interface id
    pub interface: String,

    /// Window start (RFC3339 or Unix seconds)
    #[arg(long, conflicts_with = "last")]
    pub start: Option<String>,

    /// Window end (RFC3339 or Unix seconds, default: now)
    #[arg(long)]
    pub end: Option<String>,

    /// Window length ending at --end, e.g. "1h", "30m", "2days"
    #[arg(long)]
    pub last: Option<String>,
}

// ── Inventory ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfacesArgs {
    /// Only interfaces of this device id
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Match hostname, address, name, description, serial or part number
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Match the transceiver vendor name
    #[arg(long)]
    pub vendor: Option<String>,

    /// Sort key
    #[arg(long, default_value = "id")]
    pub sort: SortKey,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Id,
    Hostname,
    Name,
}

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    /// Interface id
    pub interface: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a profile value
    Set {
        /// Profile key (store_url, api_key, api_key_env, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API key in the system keyring
    SetKey {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
