//! Setup options and their loading from the runner environment.
//!
//! This module provides the [`SetupOptions`] struct describing what to
//! install, and [`SetupOptions::from_env`] for reading it from action
//! inputs.

use crate::Edition;
use thiserror::Error;

/// Environment variable holding the `version` input.
pub const VERSION_INPUT: &str = "INPUT_VERSION";
/// Environment variable holding the `edition` input.
pub const EDITION_INPUT: &str = "INPUT_EDITION";
/// Environment variable holding the `cache` input.
pub const CACHE_INPUT: &str = "INPUT_CACHE";
/// Environment variable holding the Pro license key.
pub const LICENSE_KEY_ENV: &str = "LIQUIBASE_LICENSE_KEY";

/// What to install.
///
/// # Default Behavior
///
/// Options built with [`SetupOptions::new`] have no license key and
/// caching disabled.
///
/// # Example
///
/// ```rust
/// use setup_liquibase::{Edition, SetupOptions};
///
/// let opts = SetupOptions::new("4.32.0", Edition::Pro)
///     .with_license_key("my-key")
///     .with_cache(true);
/// assert!(opts.cache);
/// assert_eq!(opts.license_key.as_deref(), Some("my-key"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SetupOptions {
    /// Exact version to install; must be 4.32.0 or newer.
    pub version: String,

    /// Edition to install.
    pub edition: Edition,

    /// License key, required for [`Edition::Pro`].
    pub license_key: Option<String>,

    /// Whether to reuse and populate the tool cache.
    ///
    /// When `false`, cached installations are ignored and the fresh
    /// installation is not written back.
    pub cache: bool,
}

impl SetupOptions {
    /// Options for `version` of `edition` with no key and caching off.
    pub fn new(version: impl Into<String>, edition: Edition) -> Self {
        Self {
            version: version.into(),
            edition,
            license_key: None,
            cache: false,
        }
    }

    /// Set the license key.
    #[must_use]
    pub fn with_license_key(mut self, key: impl Into<String>) -> Self {
        self.license_key = Some(key.into());
        self
    }

    /// Enable or disable caching.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// The license key when present and not blank.
    pub fn usable_license_key(&self) -> Option<&str> {
        self.license_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Load options from the process environment.
    ///
    /// | Variable                | Meaning                           | Default  |
    /// |-------------------------|-----------------------------------|----------|
    /// | `INPUT_VERSION`         | Exact version                     | required |
    /// | `INPUT_EDITION`         | `oss` or `pro`                    | `oss`    |
    /// | `INPUT_CACHE`           | `true` or `false`                 | `false`  |
    /// | `LIQUIBASE_LICENSE_KEY` | Pro license key                   | none     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load options through an arbitrary variable lookup.
    ///
    /// Values are trimmed; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let version = get(VERSION_INPUT).ok_or(ConfigError::MissingInput {
            name: VERSION_INPUT,
        })?;

        let edition = match get(EDITION_INPUT) {
            Some(value) => value
                .parse::<Edition>()
                .map_err(|_| ConfigError::InvalidEdition { value })?,
            None => Edition::Oss,
        };

        let cache = match get(CACHE_INPUT) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBoolean {
                name: CACHE_INPUT,
                value,
            })?,
            None => false,
        };

        // The key is passed through untrimmed; blank keys are rejected later.
        let license_key = lookup(LICENSE_KEY_ENV).filter(|v| !v.is_empty());

        Ok(Self {
            version,
            edition,
            license_key,
            cache,
        })
    }
}

// Hand-written so the license key never reaches logs.
impl std::fmt::Debug for SetupOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupOptions")
            .field("version", &self.version)
            .field("edition", &self.edition)
            .field("license_key", &self.license_key.as_ref().map(|_| "<redacted>"))
            .field("cache", &self.cache)
            .finish()
    }
}

/// Errors reading setup options from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required input was not provided.
    #[error("Input required and not supplied: {name}")]
    MissingInput {
        /// Environment variable name.
        name: &'static str,
    },

    /// The edition input is not a known edition.
    #[error("Invalid edition '{value}'. Must be 'oss' or 'pro'")]
    InvalidEdition {
        /// The value supplied.
        value: String,
    },

    /// A boolean input is not `true` or `false`.
    #[error("Input {name} must be 'true' or 'false', got '{value}'")]
    InvalidBoolean {
        /// Environment variable name.
        name: &'static str,
        /// The value supplied.
        value: String,
    },
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
