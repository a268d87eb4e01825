use crate::types::{DuplicatePolicyArg, LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dasmine")]
#[command(
    about = "Reconstruct session windows from database activity-stream logs",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: $DASMINE_CONFIG, then <config dir>/dasmine/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Keep events of the administrative database account
    #[arg(long, global = true)]
    pub include_admin: bool,

    /// Administrative account to exclude
    #[arg(long, global = true, value_name = "NAME")]
    pub admin_user: Option<String>,

    /// Report progress every N input lines per pass (0 disables)
    #[arg(long, global = true, value_name = "N")]
    pub progress_interval: Option<u64>,

    #[arg(long, global = true)]
    pub duplicate_policy: Option<DuplicatePolicyArg>,

    /// Normalize the input once and replay it from memory for every pass
    #[arg(long, global = true)]
    pub buffer: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an activity log into one CSV row per query
    Convert {
        /// Activity log in JSON lines, or '-' for stdin
        input: String,

        /// CSV destination, or '-' for stdout
        output: String,
    },

    /// Print the reconstructed session windows
    Sessions {
        /// Activity log in JSON lines, or '-' for stdin
        input: String,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}
