//! Clap derive structures for the `aruba1830` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aruba1830 -- manage Aruba Instant On 1830 switches
#[derive(Debug, Parser)]
#[command(
    name = "aruba1830",
    version,
    about = "CLI tool for managing Aruba Instant On 1830 switches",
    long_about = "Talks to the switch's web-management interface over HTTP.\n\n\
        Reads the MAC table, ports, VLANs, PoE and system state, and enables,\n\
        disables or bans ports. Disabled ports are remembered in a local\n\
        port activity log so a banned MAC can be found again later.",
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
    /// Switch profile to use
    #[arg(long, short = 'p', env = "ARUBA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Switch IP address or hostname (overrides profile)
    #[arg(long, env = "ARUBA_HOST", global = true)]
    pub host: Option<String>,

    /// Username for authentication
    #[arg(long, env = "ARUBA_USERNAME", global = true)]
    pub user: Option<String>,

    /// Password for authentication
    #[arg(long, env = "ARUBA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Reuse an existing session token
    #[arg(long, env = "ARUBA_SESSION_TOKEN", global = true)]
    pub session_token: Option<String>,

    /// Reuse an existing session cookie (e.g. from a browser)
    #[arg(
        long,
        env = "ARUBA_SESSION_COOKIE",
        global = true,
        hide_env_values = true
    )]
    pub session_cookie: Option<String>,

    /// Path to the port activity log file
    #[arg(long, global = true, value_name = "PATH")]
    pub port_mac_file: Option<PathBuf>,

    /// Path to the MAC alias file
    #[arg(long, global = true, value_name = "PATH")]
    pub mac_alias_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARUBA_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile, default 30)
    #[arg(long, env = "ARUBA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Display the MAC address table
    #[command(alias = "mac")]
    MacTable(MacTableArgs),

    /// Port management operations
    #[command(alias = "port")]
    Ports(PortsArgs),

    /// System information and logs
    #[command(alias = "sys")]
    System(SystemArgs),

    /// VLAN information
    #[command(alias = "vlan")]
    Vlans(VlansArgs),

    /// Power over Ethernet
    Poe(PoeArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── MAC table ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MacTableArgs {
    /// Filter by VLAN ID
    #[arg(long)]
    pub vlan: Option<u16>,

    /// Filter by port number
    #[arg(long)]
    pub port: Option<String>,
}

// ── Ports ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// List all ports
    #[command(alias = "ls")]
    List,

    /// Enable a port by number, MAC address or alias, or enable all ports
    Enable {
        /// Port number, MAC address, alias, or 'all'
        #[arg(value_name = "TARGET")]
        target: String,
    },

    /// Disable a port by number, MAC address or alias, or disable all ports
    Disable {
        /// Port number, MAC address, alias, or 'all'
        #[arg(value_name = "TARGET")]
        target: String,

        /// Disable even if other MACs share the port
        #[arg(long)]
        force: bool,
    },

    /// Ban a MAC address by disabling its port and tracking moves
    Ban {
        /// MAC address or alias
        #[arg(value_name = "MAC")]
        mac: String,

        /// Disable even if other MACs share the port
        #[arg(long)]
        force: bool,
    },

    /// Show the port activity log
    Log,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Display system information
    Info,

    /// Display the system log
    Logs {
        /// Only show the last N entries
        #[arg(long, short = 'n')]
        tail: Option<usize>,
    },
}

// ── VLANs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// List VLANs
    #[command(alias = "ls")]
    List,
}

// ── PoE ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PoeArgs {
    #[command(subcommand)]
    pub command: PoeCommand,
}

#[derive(Debug, Subcommand)]
pub enum PoeCommand {
    /// Show PoE status per port
    Status,

    /// Turn PoE on for a port
    Enable {
        /// Port number
        port: String,
    },

    /// Turn PoE off for a port
    Disable {
        /// Port number
        port: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
