mod cli;
mod commands;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 RMSD++ CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Pair(args) => {
            info!("Dispatching to 'pair' command.");
            commands::pair::run(args)
        }
        Commands::Reference(args) => {
            info!("Dispatching to 'reference' command.");
            commands::reference::run(args)
        }
        Commands::Matrix(args) => {
            info!("Dispatching to 'matrix' command.");
            commands::matrix::run(args)
        }
    };

    // Results go to stdout; status stays on stderr so output pipes clean.
    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
        }
    }

    command_result
}
