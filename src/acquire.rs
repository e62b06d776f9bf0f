//! Archive download and extraction.
//!
//! [`Acquirer`] is the seam the installer uses to fetch a distribution.
//! [`HttpAcquirer`] is the production implementation: it streams the
//! archive over HTTP(S) into a scratch file and unpacks it into a fresh
//! scratch directory.

use crate::AcquireError;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use futures::StreamExt;
use reqwest::Client;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

/// Downloads archives and extracts them to directories.
///
/// Implementations must not retry; the first failure is returned as-is.
#[async_trait]
pub trait Acquirer: Send + Sync {
    /// Download `url` to a local file and return its path.
    async fn download(&self, url: &str) -> Result<PathBuf, AcquireError>;

    /// Extract a ZIP archive into a new directory and return that directory.
    async fn extract_zip(&self, archive: &Path) -> Result<PathBuf, AcquireError>;

    /// Extract a gzip-compressed tar archive into a new directory and return
    /// that directory.
    async fn extract_tar_gz(&self, archive: &Path) -> Result<PathBuf, AcquireError>;

    /// Remove a downloaded archive or extraction directory that is no
    /// longer needed.
    ///
    /// Best effort: failures are logged and otherwise ignored.
    async fn discard(&self, path: &Path) {
        let removed = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
            Ok(_) => tokio::fs::remove_file(path).await,
            Err(e) => Err(e),
        };
        match removed {
            Ok(()) => trace!(path = ?path, "Discarded scratch path"),
            Err(e) => debug!(path = ?path, error = %e, "Failed to discard scratch path"),
        }
    }
}

/// HTTP(S) acquirer backed by `reqwest`.
///
/// Downloads and extraction directories are created under a scratch root,
/// normally the runner's `RUNNER_TEMP`. Every archive and extraction gets a
/// unique name, so concurrent runs sharing a scratch root never collide.
#[derive(Debug, Clone)]
pub struct HttpAcquirer {
    client: Client,
    scratch: PathBuf,
}

impl HttpAcquirer {
    /// Create an acquirer that works under `scratch`.
    pub fn new(scratch: impl Into<PathBuf>) -> Result<Self, AcquireError> {
        let client = Client::builder()
            .user_agent(concat!("setup-liquibase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AcquireError::Client)?;

        Ok(Self {
            client,
            scratch: scratch.into(),
        })
    }

    /// Create an acquirer rooted at `RUNNER_TEMP`, or the system temp
    /// directory outside a runner.
    pub fn from_env() -> Result<Self, AcquireError> {
        let scratch = std::env::var_os("RUNNER_TEMP")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::new(scratch)
    }

    /// Scratch root used for downloads and extraction.
    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    fn scratch_dir(&self, prefix: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.scratch)?;
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.scratch)?;
        Ok(dir.keep())
    }

    fn scratch_file(&self, name: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.scratch)?;
        let suffix = format!("-{name}");
        let (_, path) = tempfile::Builder::new()
            .prefix("liquibase-download-")
            .suffix(&suffix)
            .tempfile_in(&self.scratch)?
            .keep()
            .map_err(|e| e.error)?;
        Ok(path)
    }
}

#[async_trait]
impl Acquirer for HttpAcquirer {
    async fn download(&self, url: &str) -> Result<PathBuf, AcquireError> {
        debug!(%url, "Downloading archive");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| AcquireError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let dest = self.scratch_file(&archive_file_name(url))?;
        let mut file = tokio::fs::File::create(&dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| AcquireError::Request {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, path = ?dest, "Download complete");
        Ok(dest)
    }

    async fn extract_zip(&self, archive: &Path) -> Result<PathBuf, AcquireError> {
        let dest = self.scratch_dir("liquibase-")?;
        debug!(archive = ?archive, dest = ?dest, "Extracting zip archive");

        let source = archive.to_path_buf();
        let target = dest.clone();
        tokio::task::spawn_blocking(move || unpack_zip(&source, &target))
            .await
            .map_err(io::Error::other)??;

        Ok(dest)
    }

    async fn extract_tar_gz(&self, archive: &Path) -> Result<PathBuf, AcquireError> {
        let dest = self.scratch_dir("liquibase-")?;
        debug!(archive = ?archive, dest = ?dest, "Extracting tar.gz archive");

        let source = archive.to_path_buf();
        let target = dest.clone();
        tokio::task::spawn_blocking(move || unpack_tar_gz(&source, &target))
            .await
            .map_err(io::Error::other)??;

        Ok(dest)
    }
}

/// File name for a downloaded archive, taken from the last URL segment.
fn archive_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "liquibase-archive".to_string(),
    }
}

fn unpack_tar_gz(archive: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(archive)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest)
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<(), AcquireError> {
    let file = File::open(archive)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Skip entries that would escape the destination.
        let outpath = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => continue,
        };
        trace!(path = ?outpath, "Unpacking zip entry");

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}
