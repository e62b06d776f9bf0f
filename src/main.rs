//! `setup-liquibase` binary: installs Liquibase from action inputs.

use setup_liquibase::{RunnerInstaller, SetupError, SetupOptions, SetupResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(result) => {
            tracing::info!(
                version = %result.version,
                path = %result.path.display(),
                "Liquibase is ready"
            );
            ExitCode::SUCCESS
        }
        Err(message) => {
            println!("::error::{}", escape_command_data(&message));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("setup_liquibase=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<SetupResult, String> {
    let options = SetupOptions::from_env().map_err(|e| e.to_string())?;
    tracing::debug!(?options, "Loaded setup options");

    let installer = RunnerInstaller::from_env().map_err(|e| e.to_string())?;
    let result = installer
        .setup(&options, |progress| {
            tracing::debug!(stage = progress.stage(), "Setup progress");
        })
        .await
        .map_err(|e| describe(&e))?;

    write_outputs(&result).map_err(|e| format!("Failed to write step outputs: {e}"))?;
    Ok(result)
}

fn describe(error: &SetupError) -> String {
    format!("{error}\nTo fix: {}", error.fix_suggestion())
}

/// Escape a workflow-command payload so multi-line messages stay in one
/// annotation.
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Append `liquibase-version` and `liquibase-path` to `GITHUB_OUTPUT`.
fn write_outputs(result: &SetupResult) -> std::io::Result<()> {
    let Some(output_file) = std::env::var_os("GITHUB_OUTPUT").filter(|v| !v.is_empty()) else {
        return Ok(());
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)?;
    writeln!(file, "liquibase-version={}", result.version)?;
    writeln!(file, "liquibase-path={}", result.path.display())?;
    Ok(())
}
