//! Requested version validation.

use crate::SetupError;
use semver::Version;
use serde::Serialize;
use std::fmt;

/// Oldest Liquibase release this installer supports.
pub const MIN_SUPPORTED_VERSION: Version = Version::new(4, 32, 0);

/// The exact version selected for download and cache lookup.
///
/// Today this is always the validated request string. It is kept as its own
/// type so a resolver for ranges or aliases can slot in ahead of download
/// without changing anything downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// The version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a requested version string.
///
/// The input must be a strict semantic version (`major.minor.patch` with
/// optional pre-release and build metadata) and must not be older than
/// [`MIN_SUPPORTED_VERSION`]. Pre-release versions of the minimum itself
/// (e.g. `4.32.0-beta.1`) sort below it and are rejected.
///
/// # Errors
///
/// - [`SetupError::InvalidVersionFormat`] if the string does not parse
/// - [`SetupError::UnsupportedVersion`] if it is below the minimum
///
/// # Example
///
/// ```rust
/// use setup_liquibase::{validate_version, SetupError};
///
/// assert_eq!(validate_version("4.32.0").unwrap().as_str(), "4.32.0");
/// assert!(matches!(
///     validate_version("4.20.0"),
///     Err(SetupError::UnsupportedVersion { .. })
/// ));
/// assert!(matches!(
///     validate_version("latest"),
///     Err(SetupError::InvalidVersionFormat { .. })
/// ));
/// ```
pub fn validate_version(version: &str) -> Result<ResolvedVersion, SetupError> {
    let parsed = Version::parse(version).map_err(|source| SetupError::InvalidVersionFormat {
        version: version.to_string(),
        source,
    })?;

    if parsed < MIN_SUPPORTED_VERSION {
        return Err(SetupError::UnsupportedVersion {
            version: version.to_string(),
            minimum: MIN_SUPPORTED_VERSION,
        });
    }

    Ok(ResolvedVersion(version.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_is_accepted() {
        let resolved = validate_version("4.32.0").unwrap();
        assert_eq!(resolved.as_str(), "4.32.0");
        assert_eq!(resolved.to_string(), "4.32.0");
    }

    #[test]
    fn test_newer_versions_are_returned_unchanged() {
        for version in ["4.32.1", "4.33.0", "5.0.0", "4.33.0+build.7", "5.0.0-rc.1"] {
            assert_eq!(validate_version(version).unwrap().as_str(), version);
        }
    }

    #[test]
    fn test_malformed_versions() {
        for version in ["", "4", "4.32", "v4.32.0", "latest", "4.32.x", " 4.32.0", "4.32.0.1"] {
            let result = validate_version(version);
            match result {
                Err(SetupError::InvalidVersionFormat { version: v, .. }) => assert_eq!(v, version),
                other => panic!("expected InvalidVersionFormat for {version:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_versions_below_minimum() {
        for version in ["4.20.0", "4.31.9", "3.10.3", "0.0.1", "4.32.0-beta.1"] {
            let result = validate_version(version);
            match result {
                Err(SetupError::UnsupportedVersion { version: v, minimum }) => {
                    assert_eq!(v, version);
                    assert_eq!(minimum, Version::new(4, 32, 0));
                }
                other => panic!("expected UnsupportedVersion for {version:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_resolved_version_serializes_as_string() {
        let resolved = validate_version("4.32.0").unwrap();
        assert_eq!(serde_json::to_string(&resolved).unwrap(), "\"4.32.0\"");
    }
}
