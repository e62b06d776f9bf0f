//! Liquibase edition enum and the cache identity derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;

/// The Liquibase product edition to install.
///
/// The edition selects the download source and whether a license
/// configuration is written after installation.
///
/// Editions parse case-insensitively from their lowercase names:
///
/// ```rust
/// use setup_liquibase::Edition;
///
/// assert_eq!("oss".parse::<Edition>().unwrap(), Edition::Oss);
/// assert_eq!("PRO".parse::<Edition>().unwrap(), Edition::Pro);
/// assert!("enterprise".parse::<Edition>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Edition {
    /// Liquibase Open Source.
    Oss,
    /// Liquibase Pro, which requires a license key.
    Pro,
}

impl Edition {
    /// Product name used in log messages.
    ///
    /// ```rust
    /// use setup_liquibase::Edition;
    ///
    /// assert_eq!(Edition::Oss.display_name(), "Liquibase Open Source");
    /// assert_eq!(Edition::Pro.display_name(), "Liquibase Pro");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Oss => "Liquibase Open Source",
            Self::Pro => "Liquibase Pro",
        }
    }

    /// Whether this edition needs a license key to be configured.
    pub fn requires_license(&self) -> bool {
        matches!(self, Self::Pro)
    }

    /// The cache key for installations of this edition.
    ///
    /// Each edition gets its own identity so cached OSS and Pro
    /// installations never satisfy each other's lookups.
    ///
    /// ```rust
    /// use setup_liquibase::Edition;
    ///
    /// assert_eq!(Edition::Oss.tool_identity().as_str(), "liquibase-oss");
    /// assert_eq!(Edition::Pro.tool_identity().as_str(), "liquibase-pro");
    /// ```
    pub fn tool_identity(&self) -> ToolIdentity {
        ToolIdentity(format!("liquibase-{}", self.as_ref()))
    }

    /// Iterator over all editions.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

/// Cache key naming a tool installation, e.g. `liquibase-pro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolIdentity(String);

impl ToolIdentity {
    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editions() {
        assert_eq!("oss".parse::<Edition>().unwrap(), Edition::Oss);
        assert_eq!("pro".parse::<Edition>().unwrap(), Edition::Pro);
        assert_eq!("Oss".parse::<Edition>().unwrap(), Edition::Oss);
        assert!("".parse::<Edition>().is_err());
        assert!("community".parse::<Edition>().is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Edition::Oss.to_string(), "oss");
        assert_eq!(Edition::Pro.to_string(), "pro");
    }

    #[test]
    fn test_tool_identities_are_distinct() {
        let identities: std::collections::HashSet<_> =
            Edition::all().map(|e| e.tool_identity()).collect();
        assert_eq!(identities.len(), 2);
        assert_eq!(Edition::Pro.tool_identity().to_string(), "liquibase-pro");
    }

    #[test]
    fn test_requires_license() {
        assert!(Edition::Pro.requires_license());
        assert!(!Edition::Oss.requires_license());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Edition::Pro).unwrap();
        assert_eq!(json, "\"pro\"");
        let parsed: Edition = serde_json::from_str("\"oss\"").unwrap();
        assert_eq!(parsed, Edition::Oss);
    }
}
