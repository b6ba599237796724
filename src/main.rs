//! ARA CLI - records test-execution artifacts into a local workspace
//!
//! Keeps a JSON configuration in `.ara/config.json` and copies reports into
//! `generated/<version>/<country>/<type>/`.

use clap::Parser;
use std::path::PathBuf;

use ara::commands::Commands;
use ara::common::logging;
use ara::workspace::Workspace;
use ara::{cli, Error};

#[derive(Parser)]
#[command(name = "ara", about = "Record test-execution artifacts for ARA")]
#[command(version, long_about = None)]
struct Cli {
    /// Workspace root (default: current directory)
    #[arg(long, global = true, env = "ARA_ROOT")]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let result = match cli.root {
        Some(root) => Ok(root),
        None => std::env::current_dir().map_err(Error::from),
    }
    .and_then(|root| cli::dispatch(cli.command, &Workspace::at(root)));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
