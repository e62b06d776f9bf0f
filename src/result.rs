//! Installation location and setup result types.

use crate::{Platform, ResolvedVersion};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A finalized installation directory and the launcher inside it.
///
/// Created once the installer has settled on a directory (cached or freshly
/// extracted) and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationLocation {
    path: PathBuf,
    binary_path: PathBuf,
}

impl InstallationLocation {
    /// Describe the installation at `path` for a host platform.
    ///
    /// ```rust
    /// use setup_liquibase::{InstallationLocation, Platform};
    /// use std::path::Path;
    ///
    /// let location = InstallationLocation::new("/opt/liquibase".into(), Platform::Unix);
    /// assert_eq!(location.binary_path(), Path::new("/opt/liquibase/liquibase"));
    /// ```
    #[must_use]
    pub fn new(path: PathBuf, platform: Platform) -> Self {
        let binary_path = platform.executable_path(&path);
        Self { path, binary_path }
    }

    /// The installation directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The launcher to invoke.
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Consume the location, keeping only the directory.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Result of a successful setup.
///
/// # Example
///
/// ```rust,no_run
/// use setup_liquibase::{setup_liquibase, Edition, SetupOptions};
///
/// #[tokio::main]
/// async fn main() {
///     let options = SetupOptions::new("4.32.0", Edition::Oss).with_cache(true);
///     let result = setup_liquibase(&options).await.unwrap();
///     println!("Liquibase {} at {}", result.version, result.path.display());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupResult {
    /// The version that was installed.
    pub version: ResolvedVersion,
    /// The directory Liquibase was installed into.
    pub path: PathBuf,
}
