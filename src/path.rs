//! Publishing the installation directory on the runner search path.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Makes a directory's executables available to later commands.
pub trait SearchPath: Send + Sync {
    /// Add `dir` to the search path.
    fn add_path(&self, dir: &Path) -> io::Result<()>;
}

/// Search path of a CI runner session.
///
/// Appends the directory to the file named by `GITHUB_PATH` (when set) so
/// later steps of the job see it, and prepends it to this process's `PATH`
/// so the rest of this run does too.
#[derive(Debug, Clone, Default)]
pub struct RunnerSearchPath {
    path_file: Option<PathBuf>,
}

impl RunnerSearchPath {
    /// Use an explicit path file, or none to only update this process.
    #[must_use]
    pub fn new(path_file: Option<PathBuf>) -> Self {
        Self { path_file }
    }

    /// Use the `GITHUB_PATH` file of the current runner session, if any.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("GITHUB_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        )
    }

    /// Record `dir` in the runner path file, if one is configured.
    fn append_to_path_file(&self, dir: &Path) -> io::Result<()> {
        let Some(path_file) = &self.path_file else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path_file)?;
        writeln!(file, "{}", dir.display())?;
        debug!(dir = ?dir, file = ?path_file, "Appended directory to runner path file");
        Ok(())
    }
}

impl SearchPath for RunnerSearchPath {
    fn add_path(&self, dir: &Path) -> io::Result<()> {
        // An unrepresentable PATH must leave the path file untouched.
        let current = std::env::var_os("PATH").unwrap_or_default();
        let updated = prepend_path(dir, &current)?;

        self.append_to_path_file(dir)?;
        std::env::set_var("PATH", updated);
        debug!(dir = ?dir, "Prepended directory to PATH");
        Ok(())
    }
}

fn prepend_path(dir: &Path, current: &OsString) -> io::Result<OsString> {
    let entries = std::iter::once(dir.to_path_buf()).chain(std::env::split_paths(current));
    std::env::join_paths(entries).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepend_path() {
        let current = std::env::join_paths([PathBuf::from("/usr/bin"), PathBuf::from("/bin")]).unwrap();
        let updated = prepend_path(Path::new("/opt/liquibase"), &current).unwrap();
        let entries: Vec<_> = std::env::split_paths(&updated).collect();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/opt/liquibase"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_prepend_rejects_separator_in_dir() {
        let result = prepend_path(Path::new("/opt/a:b"), &OsString::from("/usr/bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_append_to_path_file() {
        let temp = TempDir::new().unwrap();
        let path_file = temp.path().join("github_path");
        std::fs::write(&path_file, "/already/there\n").unwrap();

        let search_path = RunnerSearchPath::new(Some(path_file.clone()));
        let dir = temp.path().join("liquibase");
        search_path.append_to_path_file(&dir).unwrap();

        let content = std::fs::read_to_string(&path_file).unwrap();
        assert_eq!(content, format!("/already/there\n{}\n", dir.display()));
    }

    #[test]
    fn test_append_creates_missing_path_file() {
        let temp = TempDir::new().unwrap();
        let path_file = temp.path().join("github_path");

        let search_path = RunnerSearchPath::new(Some(path_file.clone()));
        search_path.append_to_path_file(Path::new("/opt/liquibase")).unwrap();

        assert_eq!(std::fs::read_to_string(&path_file).unwrap(), "/opt/liquibase\n");
    }

    #[test]
    fn test_append_without_path_file_is_noop() {
        let search_path = RunnerSearchPath::new(None);
        search_path.append_to_path_file(Path::new("/opt/liquibase")).unwrap();
    }
}
