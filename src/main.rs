use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use revchart::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for revchart::AppCommand {
    fn from(cmd: Commands) -> revchart::AppCommand {
        match cmd {
            Commands::Chart { output_dir } => revchart::AppCommand::Chart { output_dir },
            Commands::Revenue => revchart::AppCommand::Revenue,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Chart share price against scraped revenue for each company
    Chart {
        /// Write <company>.html and <company>.svg here instead of printing the HTML
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the scraped revenue table for each company
    Revenue,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => revchart::cli::setup::setup(),
        Some(cmd) => revchart::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
