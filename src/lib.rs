//! # setup-liquibase
//!
//! Installs Liquibase (Open Source or Pro) into an ephemeral CI runner and
//! puts the `liquibase` launcher on the search path for later steps.
//!
//! The core is the setup flow driven by [`Installer`]:
//!
//! 1. Validate the requested version ([`validate_version`]) and, for Pro,
//!    the presence of a license key
//! 2. Reuse a cached installation through [`ToolCache`], or download and
//!    extract one through [`Acquirer`]
//! 3. Publish the installation directory via [`SearchPath`]
//! 4. Write the Pro license configuration ([`configure_pro`])
//! 5. Confirm the launcher runs via [`ProcessRunner`]
//!
//! Collaborators are traits; [`RunnerInstaller::from_env`] wires up the
//! production implementations for a hosted runner.
//!
//! ## Example
//!
//! ```rust,no_run
//! use setup_liquibase::{setup_liquibase, Edition, SetupOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = SetupOptions::new("4.32.0", Edition::Pro)
//!         .with_license_key(std::env::var("LIQUIBASE_LICENSE_KEY").unwrap_or_default())
//!         .with_cache(true);
//!
//!     match setup_liquibase(&options).await {
//!         Ok(result) => println!("Liquibase {} at {:?}", result.version, result.path),
//!         Err(e) => eprintln!("{}. Fix: {}", e, e.fix_suggestion()),
//!     }
//! }
//! ```

mod acquire;
mod cache;
mod configure;
mod edition;
mod error;
mod installer;
mod options;
mod path;
mod platform;
mod progress;
mod result;
mod urls;
mod validate;
mod version;

pub use acquire::{Acquirer, HttpAcquirer};
pub use cache::{FileToolCache, ToolCache};
pub use configure::{configure_pro, LICENSE_KEY_PROPERTY, PROPERTIES_FILE};
pub use edition::{Edition, ToolIdentity};
pub use error::{AcquireError, SetupError, ValidationFailure};
pub use installer::{setup_liquibase, Installer, RunnerInstaller};
pub use options::{
    ConfigError, SetupOptions, CACHE_INPUT, EDITION_INPUT, LICENSE_KEY_ENV, VERSION_INPUT,
};
pub use path::{RunnerSearchPath, SearchPath};
pub use platform::{ArchiveFormat, Platform, EXECUTABLE_NAME};
pub use progress::SetupProgress;
pub use result::{InstallationLocation, SetupResult};
pub use urls::{DownloadUrls, VERSION_PLACEHOLDER};
pub use validate::{
    validate_installation, ExitOutcome, ProcessRunner, TokioProcessRunner, VERSION_FLAG,
};
pub use version::{validate_version, ResolvedVersion, MIN_SUPPORTED_VERSION};
