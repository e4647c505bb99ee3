use anyhow::Result;
use clap::Parser;

use crate::Commands;

#[derive(Parser)]
#[command(name = "udpatch")]
#[command(about = "Re-bind device scripts to the UD naming scheme", long_about = None)]
pub(crate) struct Cli {
    /// Log resolution and planning steps
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    crate::cli_exec::handle_command(cli.command)
}
