//! Post-install validation by running the installed launcher.

use crate::{InstallationLocation, SetupError, ValidationFailure};
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Flag passed to the launcher to confirm it runs.
pub const VERSION_FLAG: &str = "--version";

/// Exit information from a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    /// Whether the process reported success.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs executables and reports how they exited.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// When `suppress_output` is set, the child's stdout and stderr are
    /// discarded instead of being inherited. Spawn failures are returned as
    /// `Err`; a non-zero exit is an `Ok` outcome.
    async fn run(&self, program: &Path, args: &[&str], suppress_output: bool)
        -> io::Result<ExitOutcome>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        suppress_output: bool,
    ) -> io::Result<ExitOutcome> {
        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if suppress_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().await?;
        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Confirm the installation runs by invoking `<launcher> --version`.
///
/// Output is suppressed. A spawn error or failing exit becomes
/// [`SetupError::InstallationValidationFailed`].
pub async fn validate_installation<R>(
    runner: &R,
    location: &InstallationLocation,
) -> Result<(), SetupError>
where
    R: ProcessRunner + ?Sized,
{
    let binary = location.binary_path();
    debug!(binary = ?binary, "Validating Liquibase installation");

    let outcome = runner
        .run(binary, &[VERSION_FLAG], true)
        .await
        .map_err(|e| SetupError::InstallationValidationFailed {
            binary: binary.to_path_buf(),
            source: ValidationFailure::Spawn(e),
        })?;

    if !outcome.success() {
        return Err(SetupError::InstallationValidationFailed {
            binary: binary.to_path_buf(),
            source: ValidationFailure::Exit { code: outcome.code },
        });
    }

    info!("Liquibase installation validated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct ScriptedRunner {
        outcome: fn() -> io::Result<ExitOutcome>,
        calls: Mutex<Vec<(PathBuf, Vec<String>, bool)>>,
    }

    impl ScriptedRunner {
        fn new(outcome: fn() -> io::Result<ExitOutcome>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProcessRunner for ScriptedRunner {
        async fn run(
            &self,
            program: &Path,
            args: &[&str],
            suppress_output: bool,
        ) -> io::Result<ExitOutcome> {
            self.calls.lock().unwrap().push((
                program.to_path_buf(),
                args.iter().map(|a| a.to_string()).collect(),
                suppress_output,
            ));
            (self.outcome)()
        }
    }

    fn location(platform: Platform) -> InstallationLocation {
        InstallationLocation::new(PathBuf::from("/tool/liquibase-oss/4.32.0"), platform)
    }

    #[tokio::test]
    async fn test_success_runs_version_silently() {
        let runner = ScriptedRunner::new(|| Ok(ExitOutcome { code: Some(0) }));
        validate_installation(&runner, &location(Platform::Unix))
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PathBuf::from("/tool/liquibase-oss/4.32.0/liquibase"));
        assert_eq!(calls[0].1, vec!["--version".to_string()]);
        assert!(calls[0].2, "output should be suppressed");
    }

    #[tokio::test]
    async fn test_windows_uses_batch_wrapper() {
        let runner = ScriptedRunner::new(|| Ok(ExitOutcome { code: Some(0) }));
        validate_installation(&runner, &location(Platform::Windows))
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            calls[0].0,
            PathBuf::from("/tool/liquibase-oss/4.32.0/liquibase.bat")
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let runner = ScriptedRunner::new(|| Ok(ExitOutcome { code: Some(1) }));
        let result = validate_installation(&runner, &location(Platform::Unix)).await;

        match result {
            Err(SetupError::InstallationValidationFailed {
                binary,
                source: ValidationFailure::Exit { code },
            }) => {
                assert_eq!(binary, PathBuf::from("/tool/liquibase-oss/4.32.0/liquibase"));
                assert_eq!(code, Some(1));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signal_exit_fails() {
        let runner = ScriptedRunner::new(|| Ok(ExitOutcome { code: None }));
        let result = validate_installation(&runner, &location(Platform::Unix)).await;
        assert!(matches!(
            result,
            Err(SetupError::InstallationValidationFailed {
                source: ValidationFailure::Exit { code: None },
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_spawn_error_is_wrapped() {
        let runner = ScriptedRunner::new(|| Err(io::Error::from(io::ErrorKind::NotFound)));
        let result = validate_installation(&runner, &location(Platform::Unix)).await;
        assert!(matches!(
            result,
            Err(SetupError::InstallationValidationFailed {
                source: ValidationFailure::Spawn(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_tokio_runner_missing_program() {
        let result = TokioProcessRunner
            .run(Path::new("/nonexistent/path/to/liquibase"), &["--version"], true)
            .await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tokio_runner_reports_exit_codes() {
        let sh = Path::new("/bin/sh");
        if sh.exists() {
            let ok = TokioProcessRunner.run(sh, &["-c", "exit 0"], true).await.unwrap();
            assert!(ok.success());

            let failed = TokioProcessRunner.run(sh, &["-c", "exit 3"], true).await.unwrap();
            assert!(!failed.success());
            assert_eq!(failed.code, Some(3));
        }
    }
}
