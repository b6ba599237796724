//! CLI command definitions
//!
//! Defines the clap commands for the ara CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Create the workspace in the current directory
    Init,

    /// Delete and recreate the workspace configuration
    Reset,

    /// Read or change the workspace configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Record test executions
    #[command(subcommand)]
    Execution(ExecutionCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the whole configuration as JSON
    List,

    /// Print the value stored at a key path
    Get {
        /// Dot-separated key path, e.g. thresholds.api.failure
        key: String,
    },

    /// Set the value stored at a key path
    Set {
        /// Dot-separated key path, e.g. thresholds.api.failure
        key: String,

        /// Value: parsed as JSON when possible (42, true, {"a":1}), stored as a string otherwise
        value: String,
    },
}

#[derive(Subcommand)]
pub enum ExecutionCommands {
    /// Copy the artifacts of one test run into the workspace
    Create {
        /// Test type, e.g. api or firefox-desktop
        #[arg(long = "type")]
        test_type: String,

        /// Country code, e.g. fr
        #[arg(long)]
        country: String,

        /// Report file or directory
        #[arg(long)]
        report: PathBuf,

        /// Step-definition file
        #[arg(long)]
        step_definition: Option<PathBuf>,

        /// Free-text comment shown with the run
        #[arg(long)]
        comment: Option<String>,

        /// URL of the CI job that produced the report
        #[arg(long)]
        job_url: String,

        /// Duration of the CI job in milliseconds
        #[arg(long)]
        job_millis: u64,
    },
}
