//! Progress reporting types for setup operations.
//!
//! The [`SetupProgress`] enum represents the discrete stages of a setup run.
//! Stages are reported in order to the callback passed to
//! [`Installer::setup`](crate::Installer::setup).

use crate::{Edition, ResolvedVersion};
use std::path::PathBuf;

/// Progress stages during setup.
///
/// # Example
///
/// ```rust
/// use setup_liquibase::SetupProgress;
///
/// fn on_progress(progress: SetupProgress) {
///     match &progress {
///         SetupProgress::Downloading { url } => println!("Downloading {url}"),
///         SetupProgress::Completed { path, .. } => println!("Ready at {}", path.display()),
///         other => println!("{other:?}"),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupProgress {
    /// Setup has started.
    Started {
        /// The edition being installed.
        edition: Edition,
    },

    /// Validating the requested version and edition.
    Validating,

    /// A cached installation will be reused.
    CacheHit {
        /// The cached directory.
        path: PathBuf,
    },

    /// Downloading the distribution.
    Downloading {
        /// The download URL.
        url: String,
    },

    /// Extracting the downloaded archive.
    Extracting,

    /// Storing the extracted installation in the tool cache.
    Caching,

    /// The installation directory was added to the search path.
    PathPublished {
        /// The installation directory.
        path: PathBuf,
    },

    /// Writing the Pro license configuration.
    Configuring,

    /// Running the installed launcher.
    Verifying,

    /// Setup completed successfully.
    Completed {
        /// The installed version.
        version: ResolvedVersion,
        /// The installation directory.
        path: PathBuf,
    },
}

impl SetupProgress {
    /// Short stage name, for logs and progress displays.
    ///
    /// ```rust
    /// use setup_liquibase::SetupProgress;
    ///
    /// assert_eq!(SetupProgress::Extracting.stage(), "extracting");
    /// ```
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Validating => "validating",
            Self::CacheHit { .. } => "cache-hit",
            Self::Downloading { .. } => "downloading",
            Self::Extracting => "extracting",
            Self::Caching => "caching",
            Self::PathPublished { .. } => "path-published",
            Self::Configuring => "configuring",
            Self::Verifying => "verifying",
            Self::Completed { .. } => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_are_unique() {
        let stages = [
            SetupProgress::Started {
                edition: Edition::Oss,
            },
            SetupProgress::Validating,
            SetupProgress::CacheHit {
                path: PathBuf::from("/c"),
            },
            SetupProgress::Downloading {
                url: "https://example.com".to_string(),
            },
            SetupProgress::Extracting,
            SetupProgress::Caching,
            SetupProgress::PathPublished {
                path: PathBuf::from("/c"),
            },
            SetupProgress::Configuring,
            SetupProgress::Verifying,
        ];
        let names: std::collections::HashSet<_> = stages.iter().map(|s| s.stage()).collect();
        assert_eq!(names.len(), stages.len());
    }
}
