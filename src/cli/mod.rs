//! CLI command handling
//!
//! Dispatches CLI commands to the workspace and formats output.

use colored::Colorize;
use serde_json::Value;

use crate::commands::{Commands, ConfigCommands, ExecutionCommands};
use crate::common::Result;
use crate::copy::ArtifactCopier;
use crate::workspace::execution::{ExecutionRecord, ExecutionRequest};
use crate::workspace::Workspace;

/// Dispatch a CLI command
pub fn dispatch(command: Commands, workspace: &Workspace) -> Result<()> {
    match command {
        Commands::Init => {
            workspace.init()?;
            println!(
                "{} Initialized workspace in {}",
                "✓".green(),
                workspace.layout().workspace_dir().display()
            );
            Ok(())
        }

        Commands::Reset => {
            workspace.reset()?;
            println!(
                "{} Reset workspace in {}",
                "✓".green(),
                workspace.layout().workspace_dir().display()
            );
            Ok(())
        }

        Commands::Config(config_cmd) => {
            workspace.ensure_initialized()?;
            let store = workspace.config();

            match config_cmd {
                ConfigCommands::List => {
                    println!("{}", store.list()?);
                }
                ConfigCommands::Get { key } => {
                    println!("{}", render_value(&store.get(&key)?));
                }
                ConfigCommands::Set { key, value } => {
                    let stored = store.set(&key, &value)?;
                    tracing::info!(key = %key, value = %stored, "configuration set");
                }
            }
            Ok(())
        }

        Commands::Execution(ExecutionCommands::Create {
            test_type,
            country,
            report,
            step_definition,
            comment,
            job_url,
            job_millis,
        }) => {
            let request = ExecutionRequest {
                test_type,
                country,
                report,
                step_definitions: step_definition,
                comment,
                job_url,
                job_millis,
            };

            let record = workspace.record_execution(&request, &ArtifactCopier::new())?;
            print_execution_recorded(&request, &record);
            Ok(())
        }
    }
}

/// Strings print raw so they can be used in shell scripts
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => format!("{other:#}"),
    }
}

fn print_execution_recorded(request: &ExecutionRequest, record: &ExecutionRecord) {
    println!(
        "{} Recorded {} execution for {} in {}",
        "✓".green(),
        request.test_type.bold(),
        request.country.bold(),
        record.destination.display()
    );
    println!("  Report:   {}", record.report.display());
    if let Some(steps) = &record.step_definitions {
        println!("  Steps:    {}", steps.display());
    }
    println!("  Job:      {} ({} ms)", request.job_url, request.job_millis);
    if let Some(comment) = &request.comment {
        println!("  Comment:  {}", comment.dimmed());
    }
    println!(
        "  Copied:   {} files, {} directories, {} symlinks ({} bytes)",
        record.stats.files, record.stats.directories, record.stats.symlinks, record.stats.bytes
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("http://ara")), "http://ara");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(
            render_value(&json!({"failure": 95})),
            "{\n  \"failure\": 95\n}"
        );
    }
}
