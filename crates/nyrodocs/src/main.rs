//! nyrodocs CLI - NyroDB site server.
//!
//! Provides commands for:
//! - `serve`: Start the site server
//! - `check`: Validate the documentation tree and bundled assets

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ServeArgs};
use error::CliError;
use output::Output;

/// nyrodocs - NyroDB marketing site, docs and changelog.
#[derive(Parser)]
#[command(name = "nyrodocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server.
    Serve(ServeArgs),
    /// Check navigation entries and bundled assets.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise RUST_LOG decides
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => serve(args, &output),
        Commands::Check(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn serve(args: ServeArgs, output: &Output) -> Result<(), CliError> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(args.execute(output))
}
