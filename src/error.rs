//! Error types for setup operations.
//!
//! Every failure is fatal to the current invocation. Each [`SetupError`]
//! variant carries the offending value and the underlying cause, and
//! offers an actionable fix suggestion.

use semver::Version;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up Liquibase.
///
/// # Example
///
/// ```rust
/// use setup_liquibase::SetupError;
///
/// fn report(error: SetupError) {
///     eprintln!("Setup failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetupError {
    /// The requested version is not a semantic version.
    #[error("Invalid version format: {version}. Must be a valid semantic version (e.g., \"4.32.0\")")]
    InvalidVersionFormat {
        /// The version string as requested.
        version: String,
        /// Parser error.
        #[source]
        source: semver::Error,
    },

    /// The requested version is older than the minimum supported version.
    #[error("Version {version} is not supported. Minimum supported version is {minimum}")]
    UnsupportedVersion {
        /// The version string as requested.
        version: String,
        /// The minimum supported version.
        minimum: Version,
    },

    /// Pro edition was requested without a license key.
    #[error("License key is required for Liquibase Pro edition")]
    MissingLicenseKey,

    /// Downloading or extracting the distribution failed.
    #[error("Failed to acquire Liquibase from {url}: {source}")]
    AcquisitionFailed {
        /// The download URL.
        url: String,
        /// Transport or extraction error.
        #[source]
        source: AcquireError,
    },

    /// Persisting the installation into the tool cache failed.
    #[error("Failed to cache {tool} version {version}: {source}")]
    CacheFailed {
        /// Tool identity used as the cache key.
        tool: String,
        /// Version used as the cache key.
        version: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the Pro license configuration failed.
    #[error("Failed to write license configuration to {}: {source}", .path.display())]
    ConfigurationFailed {
        /// The properties file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Adding the installation directory to the search path failed.
    #[error("Failed to add {} to PATH: {source}", .path.display())]
    SearchPathFailed {
        /// The installation directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The installed binary did not run successfully.
    #[error("Failed to validate Liquibase installation: {source}")]
    InstallationValidationFailed {
        /// The launcher that was executed.
        binary: PathBuf,
        /// Spawn error or failing exit.
        #[source]
        source: ValidationFailure,
    },
}

impl SetupError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// ```rust
    /// use setup_liquibase::SetupError;
    ///
    /// let error = SetupError::MissingLicenseKey;
    /// assert!(error.fix_suggestion().contains("LIQUIBASE_LICENSE_KEY"));
    /// ```
    pub fn fix_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidVersionFormat { .. } => {
                "Specify an exact version such as 4.32.0 (ranges and 'latest' are not supported)"
            }
            Self::UnsupportedVersion { .. } => "Request Liquibase 4.32.0 or newer",
            Self::MissingLicenseKey => {
                "Set the LIQUIBASE_LICENSE_KEY environment variable from a repository secret"
            }
            Self::AcquisitionFailed { .. } => {
                "Check that the version exists and that the runner can reach the download host"
            }
            Self::CacheFailed { .. } => {
                "Check free space and permissions in the tool cache directory, or disable caching"
            }
            Self::ConfigurationFailed { .. } => {
                "Check write permissions on the installation directory"
            }
            Self::SearchPathFailed { .. } => "Check that GITHUB_PATH points to a writable file",
            Self::InstallationValidationFailed { .. } => {
                "Ensure a Java runtime is available on the runner and the archive is not corrupt"
            }
        }
    }
}

/// Errors raised while downloading or extracting a distribution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AcquireError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request failed before a response was received, or mid-body.
    #[error("request to {url} failed: {source}")]
    Request {
        /// The requested URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("download of {url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Filesystem error, including tar and gzip decoding failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP archive could not be read.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Why running the installed launcher failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationFailure {
    /// The process could not be started.
    #[error("failed to run liquibase: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process ran but reported failure.
    #[error("liquibase --version exited with {}", describe_code(.code))]
    Exit {
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let source = Version::parse("not-a-version").unwrap_err();
        let error = SetupError::InvalidVersionFormat {
            version: "not-a-version".to_string(),
            source,
        };
        assert_eq!(
            error.to_string(),
            "Invalid version format: not-a-version. Must be a valid semantic version (e.g., \"4.32.0\")"
        );
    }

    #[test]
    fn test_unsupported_version_display() {
        let error = SetupError::UnsupportedVersion {
            version: "4.20.0".to_string(),
            minimum: Version::new(4, 32, 0),
        };
        assert_eq!(
            error.to_string(),
            "Version 4.20.0 is not supported. Minimum supported version is 4.32.0"
        );
    }

    #[test]
    fn test_acquisition_failed_carries_cause() {
        let error = SetupError::AcquisitionFailed {
            url: "https://example.com/liquibase.tar.gz".to_string(),
            source: AcquireError::Status {
                url: "https://example.com/liquibase.tar.gz".to_string(),
                status: 404,
            },
        };
        let message = error.to_string();
        assert!(message.contains("https://example.com/liquibase.tar.gz"));
        assert!(message.contains("HTTP 404"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_validation_failed_display() {
        let error = SetupError::InstallationValidationFailed {
            binary: PathBuf::from("/opt/liquibase/liquibase"),
            source: ValidationFailure::Exit { code: Some(127) },
        };
        assert_eq!(
            error.to_string(),
            "Failed to validate Liquibase installation: liquibase --version exited with code 127"
        );

        let signalled = ValidationFailure::Exit { code: None };
        assert!(signalled.to_string().contains("signal"));
    }

    #[test]
    fn test_all_variants_have_fix() {
        let errors = vec![
            SetupError::InvalidVersionFormat {
                version: "x".to_string(),
                source: Version::parse("x").unwrap_err(),
            },
            SetupError::UnsupportedVersion {
                version: "4.0.0".to_string(),
                minimum: Version::new(4, 32, 0),
            },
            SetupError::MissingLicenseKey,
            SetupError::AcquisitionFailed {
                url: "u".to_string(),
                source: AcquireError::Io(std::io::Error::other("boom")),
            },
            SetupError::CacheFailed {
                tool: "liquibase-oss".to_string(),
                version: "4.32.0".to_string(),
                source: std::io::Error::other("disk full"),
            },
            SetupError::ConfigurationFailed {
                path: PathBuf::from("/x/liquibase.properties"),
                source: std::io::Error::other("read-only"),
            },
            SetupError::SearchPathFailed {
                path: PathBuf::from("/x"),
                source: std::io::Error::other("denied"),
            },
            SetupError::InstallationValidationFailed {
                binary: PathBuf::from("/x/liquibase"),
                source: ValidationFailure::Spawn(std::io::Error::other("no such file")),
            },
        ];

        for error in errors {
            assert!(
                !error.fix_suggestion().is_empty(),
                "fix_suggestion() should be non-empty for {:?}",
                error
            );
        }
    }
}
