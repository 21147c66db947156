//! Clap derive structures for the `orei` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// orei -- control an OREI HDMI matrix from the command line
#[derive(Debug, Parser)]
#[command(
    name = "orei",
    version,
    about = "Control OREI HDMI matrix switchers from the command line",
    long_about = "Query routing, power and signal state of an OREI HDMI matrix\n\
        and switch sources over its HTTP control API.",
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
    /// Configured device to use
    #[arg(long, short = 'd', env = "OREI_DEVICE", global = true)]
    pub device: Option<String>,

    /// Matrix hostname or IP (overrides the configured device)
    #[arg(long, short = 'H', env = "OREI_HOST", global = true)]
    pub host: Option<String>,

    /// HTTP port of the matrix
    #[arg(long, env = "OREI_PORT", global = true)]
    pub port: Option<u16>,

    /// Alternate config file
    #[arg(long, env = "OREI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OREI_OUTPUT",
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

    /// Request timeout in seconds
    #[arg(long, env = "OREI_TIMEOUT", global = true)]
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
    /// Check that the matrix answers and show its identity
    Probe,

    /// Show power, routing and signal state
    #[command(alias = "st")]
    Status,

    /// Route a source to an output
    #[command(alias = "r")]
    Route(RouteArgs),

    /// Power the matrix on or off
    Power(PowerArgs),

    /// Poll the matrix and print every change
    Watch(WatchArgs),

    /// Manage CLI configuration and devices
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Output number (1-based)
    #[arg(id = "output_port", value_name = "OUTPUT")]
    pub output: u8,

    /// Source name as shown by `orei status`, or "Input N"
    pub source: String,
}

#[derive(Debug, Args)]
pub struct PowerArgs {
    pub state: PowerState,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Polling interval in seconds (defaults to the configured scan interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Exit after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Add a device to the config file
    Init {
        /// Device name
        #[arg(long, default_value = "default")]
        name: String,

        /// Matrix hostname or IP
        #[arg(long = "device-host")]
        host: String,

        /// HTTP port
        #[arg(long = "device-port", default_value = "80")]
        port: u16,

        /// Number of inputs
        #[arg(long, default_value = "4")]
        inputs: u8,

        /// Number of outputs
        #[arg(long, default_value = "4")]
        outputs: u8,

        /// Make this the default device
        #[arg(long)]
        default: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn route_output_does_not_clash_with_format_flag() {
        let cli = Cli::try_parse_from(["orei", "-o", "json", "route", "3", "Xbox"]).unwrap();
        assert!(matches!(cli.global.output, OutputFormat::Json));
        let Command::Route(args) = cli.command else {
            panic!("expected route, got {:?}", cli.command);
        };
        assert_eq!(args.output, 3);
        assert_eq!(args.source, "Xbox");
    }
}
