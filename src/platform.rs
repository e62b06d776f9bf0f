//! Host platform descriptor.
//!
//! The platform family decides which download template, archive format and
//! executable wrapper are used. It is passed around explicitly rather than
//! read from the compile target at each decision point, so every branch can
//! be exercised from any host.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the Liquibase launcher inside an installation directory.
pub const EXECUTABLE_NAME: &str = "liquibase";

/// Platform family of the host running the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows hosts: ZIP archives and a `.bat` launcher.
    Windows,
    /// Linux, macOS and other Unix-like hosts: tar.gz archives.
    Unix,
}

/// Archive format of a downloaded distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl Platform {
    /// The platform of the current host.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Whether this is the Windows family.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Archive format published for this platform.
    pub fn archive_format(&self) -> ArchiveFormat {
        match self {
            Self::Windows => ArchiveFormat::Zip,
            Self::Unix => ArchiveFormat::TarGz,
        }
    }

    /// Path of the launcher to invoke inside an installation directory.
    ///
    /// ```rust
    /// use setup_liquibase::Platform;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/opt/liquibase");
    /// assert_eq!(Platform::Unix.executable_path(dir), dir.join("liquibase"));
    /// assert_eq!(Platform::Windows.executable_path(dir), dir.join("liquibase.bat"));
    /// ```
    pub fn executable_path(&self, dir: &Path) -> PathBuf {
        match self {
            Self::Windows => dir.join(format!("{EXECUTABLE_NAME}.bat")),
            Self::Unix => dir.join(EXECUTABLE_NAME),
        }
    }
}
