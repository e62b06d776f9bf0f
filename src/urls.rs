//! Download URL resolution.

use crate::{Edition, Platform, ResolvedVersion};

/// Placeholder substituted with the resolved version in every template.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Download URL templates keyed by edition and platform family.
///
/// Each template may contain any number of `{version}` placeholders; all of
/// them are substituted on resolution. The [`Default`] templates point at
/// the official Liquibase distribution endpoints.
///
/// # Example
///
/// ```rust
/// use setup_liquibase::{validate_version, DownloadUrls, Edition, Platform};
///
/// let urls = DownloadUrls::default();
/// let version = validate_version("4.32.0").unwrap();
/// assert_eq!(
///     urls.resolve(&version, Edition::Oss, Platform::Unix),
///     "https://github.com/liquibase/liquibase/releases/download/v4.32.0/liquibase-4.32.0.tar.gz"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadUrls {
    /// Open Source tar.gz for Linux and macOS.
    pub oss_unix: String,
    /// Open Source zip for Windows.
    pub oss_windows: String,
    /// Pro tar.gz for Linux and macOS.
    pub pro_unix: String,
    /// Pro zip for Windows.
    pub pro_windows: String,
}

impl Default for DownloadUrls {
    fn default() -> Self {
        Self {
            oss_unix: "https://github.com/liquibase/liquibase/releases/download/v{version}/liquibase-{version}.tar.gz".to_string(),
            oss_windows: "https://github.com/liquibase/liquibase/releases/download/v{version}/liquibase-{version}.zip".to_string(),
            pro_unix: "https://repo.liquibase.com/releases/pro/{version}/liquibase-pro-{version}.tar.gz".to_string(),
            pro_windows: "https://repo.liquibase.com/releases/pro/{version}/liquibase-pro-{version}.zip".to_string(),
        }
    }
}

impl DownloadUrls {
    /// The template for an edition on a platform family.
    pub fn template(&self, edition: Edition, platform: Platform) -> &str {
        match (edition, platform) {
            (Edition::Oss, Platform::Unix) => &self.oss_unix,
            (Edition::Oss, Platform::Windows) => &self.oss_windows,
            (Edition::Pro, Platform::Unix) => &self.pro_unix,
            (Edition::Pro, Platform::Windows) => &self.pro_windows,
        }
    }

    /// Resolve the download URL for a version, edition and host platform.
    ///
    /// Purely local: no network access happens here.
    pub fn resolve(&self, version: &ResolvedVersion, edition: Edition, platform: Platform) -> String {
        self.template(edition, platform)
            .replace(VERSION_PLACEHOLDER, version.as_str())
    }
}
