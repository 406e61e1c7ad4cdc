use clap::{Parser, Subcommand, ValueEnum};
use limits_types::{LimitKind, LimitState};
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "api-limits")]
#[command(version = BUILD_VERSION)]
#[command(about = "Inspect and edit per-role API limits")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE", env = "API_LIMITS_FILE", help = "Edit limits stored in a local JSON file instead of the endpoint")]
    pub file: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show API limits")]
    Show {
        #[arg(long, help = "Only show the limits that apply to this role")]
        role: Option<String>,
    },

    #[command(about = "Update one limit for a role")]
    #[command(long_about = "Update one limit for a role and save the result.\n\nFor the 'global' role the value is the default applied to every role without an override.")]
    Set {
        #[arg(long, help = "Role to edit ('global' for the defaults)")]
        role: String,
        #[arg(long, value_parser = parse_kind, help = "Limit kind (depth_limit, node_limit, batch_limit, rate_limit, time_limit)")]
        kind: LimitKind,
        #[arg(long, value_parser = parse_state, help = "Limit state (global, per_role, disabled)")]
        state: Option<LimitState>,
        #[arg(long, help = "Limit value (requests per minute for rate_limit)")]
        value: Option<String>,
        #[arg(long, help = "Rate limit unique parameters: 'IP' or a comma separated list")]
        unique_params: Option<String>,
    },

    #[command(about = "Remove all limits of a role")]
    Remove {
        #[arg(long, help = "Role whose settings are removed")]
        role: String,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Clone, Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Validate configuration")]
    Validate,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
}

fn parse_kind(s: &str) -> Result<LimitKind, String> {
    s.parse().map_err(|e: limits_types::LimitsError| e.to_string())
}

fn parse_state(s: &str) -> Result<LimitState, String> {
    s.parse().map_err(|e: limits_types::LimitsError| e.to_string())
}
