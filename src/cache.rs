//! Tool cache lookup and persistence.
//!
//! [`ToolCache`] is the seam the installer uses to reuse previous
//! installations. [`FileToolCache`] is the production implementation and
//! follows the hosted-runner tool cache layout:
//!
//! ```text
//! $RUNNER_TOOL_CACHE/
//! └── liquibase-oss/
//!     └── 4.32.0/
//!         ├── x64/            # installation directory
//!         └── x64.complete    # written last; marks the entry usable
//! ```
//!
//! Entries are copied into a staging directory next to `x64/` and renamed
//! into place, so `x64/` only ever exists as a complete tree.

use crate::{ResolvedVersion, ToolIdentity};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Finds and stores tool installations keyed by (tool identity, version).
///
/// Implementations own their own concurrency safety: two writers for the
/// same key must never leave a half-written entry that `find` reports.
#[async_trait]
pub trait ToolCache: Send + Sync {
    /// Look up a complete installation for `tool` at `version`.
    fn find(&self, tool: &ToolIdentity, version: &ResolvedVersion) -> Option<PathBuf>;

    /// Persist `source` under (`tool`, `version`) and return the cached
    /// directory, which may differ from `source`.
    ///
    /// If another writer completed the same entry first, its copy is kept
    /// and returned.
    async fn store(
        &self,
        source: &Path,
        tool: &ToolIdentity,
        version: &ResolvedVersion,
    ) -> io::Result<PathBuf>;
}

/// Directory-backed tool cache.
#[derive(Debug, Clone)]
pub struct FileToolCache {
    root: PathBuf,
    arch: String,
}

impl FileToolCache {
    /// Create a cache rooted at `root` for the host architecture.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            arch: host_arch().to_string(),
        }
    }

    /// Create a cache rooted at `RUNNER_TOOL_CACHE`, falling back to a
    /// directory under the system temp dir outside a runner.
    #[must_use]
    pub fn from_env() -> Self {
        let root = std::env::var_os("RUNNER_TOOL_CACHE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("setup-liquibase").join("tool-cache"));
        Self::new(root)
    }

    /// Override the architecture segment of cache paths.
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Directory holding the installation for a key.
    #[must_use]
    pub fn entry_dir(&self, tool: &ToolIdentity, version: &ResolvedVersion) -> PathBuf {
        self.version_dir(tool, version).join(&self.arch)
    }

    fn version_dir(&self, tool: &ToolIdentity, version: &ResolvedVersion) -> PathBuf {
        self.root.join(tool.as_str()).join(version.as_str())
    }

    fn marker_path(&self, tool: &ToolIdentity, version: &ResolvedVersion) -> PathBuf {
        self.version_dir(tool, version)
            .join(format!("{}.complete", self.arch))
    }
}

#[async_trait]
impl ToolCache for FileToolCache {
    fn find(&self, tool: &ToolIdentity, version: &ResolvedVersion) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if self.marker_path(tool, version).is_file() && dir.is_dir() {
            trace!(%tool, %version, path = ?dir, "Tool cache hit");
            Some(dir)
        } else {
            trace!(%tool, %version, "Tool cache miss");
            None
        }
    }

    async fn store(
        &self,
        source: &Path,
        tool: &ToolIdentity,
        version: &ResolvedVersion,
    ) -> io::Result<PathBuf> {
        let version_dir = self.version_dir(tool, version);
        let dest = self.entry_dir(tool, version);
        let marker = self.marker_path(tool, version);
        let staging_prefix = format!(".{}-staging-", self.arch);

        let source = source.to_path_buf();
        let target = dest.clone();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            std::fs::create_dir_all(&version_dir)?;
            let staging = tempfile::Builder::new()
                .prefix(&staging_prefix)
                .tempdir_in(&version_dir)?;
            copy_dir_all(&source, staging.path())?;
            publish(staging.path(), &target)?;
            std::fs::write(&marker, b"")?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        debug!(%tool, %version, path = ?dest, "Stored installation in tool cache");
        Ok(dest)
    }
}

/// Rename a fully copied staging tree onto `dest`.
///
/// `dest` is never modified in place. If it already exists it was renamed
/// there complete by an earlier or concurrent writer and is kept; the
/// staging tree is then dropped by its owner.
fn publish(staging: &Path, dest: &Path) -> io::Result<()> {
    match std::fs::rename(staging, dest) {
        Ok(()) => Ok(()),
        Err(_) if dest.is_dir() => {
            trace!(path = ?dest, "Entry already published by another writer");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Architecture name in the runner's tool cache vocabulary.
fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x86",
        "arm" => "arm",
        other => other,
    }
}

fn copy_dir_all(source: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target = dest.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    let link = std::fs::read_link(source)?;
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::fs::copy(source, target).map(|_| ())
}
