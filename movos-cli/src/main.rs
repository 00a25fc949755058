//! Movos CLI - Command-line interface
//!
//! Browse feeds, search the catalog and manage the local account from a
//! terminal.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use movos_core::MovosConfig;
use movos_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "movos")]
#[command(about = "Browse movies and TV shows")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Use the built-in offline catalog instead of TMDB
    #[arg(long, global = true)]
    demo: bool,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the preference store, overrides MOVOS_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logs_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| MovosConfig::from_env().storage.data_dir)
        .join("logs");
    init_tracing(cli.log_level.as_tracing_level(), Some(&logs_dir))?;

    let options = commands::GlobalOptions {
        demo: cli.demo,
        data_dir: cli.data_dir,
    };
    commands::handle_command(cli.command, options).await
}
