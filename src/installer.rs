//! Setup orchestration.
//!
//! [`Installer`] sequences validation, cache consultation, acquisition,
//! path publication, edition configuration and post-install validation.
//! Every step waits for the previous one; the first failure aborts the run.

use crate::acquire::{Acquirer, HttpAcquirer};
use crate::cache::{FileToolCache, ToolCache};
use crate::path::{RunnerSearchPath, SearchPath};
use crate::validate::{validate_installation, ProcessRunner, TokioProcessRunner};
use crate::{
    configure_pro, validate_version, AcquireError, ArchiveFormat, DownloadUrls,
    InstallationLocation, Platform, ResolvedVersion, SetupError, SetupOptions, SetupProgress,
    SetupResult,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Coordinates a Liquibase setup over pluggable collaborators.
///
/// The collaborators are capability traits so the orchestration can run
/// against in-memory fakes. [`RunnerInstaller::from_env`] wires up the production
/// implementations for a CI runner.
///
/// # Example
///
/// ```rust,no_run
/// use setup_liquibase::{Edition, RunnerInstaller, SetupOptions};
///
/// #[tokio::main]
/// async fn main() {
///     let installer = RunnerInstaller::from_env().expect("HTTP client");
///     let options = SetupOptions::new("4.32.0", Edition::Oss).with_cache(true);
///
///     match installer.setup(&options, |p| println!("{}", p.stage())).await {
///         Ok(result) => println!("Installed {} at {:?}", result.version, result.path),
///         Err(e) => eprintln!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Installer<C, A, R, P> {
    cache: C,
    acquirer: A,
    runner: R,
    search_path: P,
    platform: Platform,
    urls: DownloadUrls,
}

/// Installer wired to the production collaborators.
pub type RunnerInstaller =
    Installer<FileToolCache, HttpAcquirer, TokioProcessRunner, RunnerSearchPath>;

impl RunnerInstaller {
    /// Build an installer for the current runner session.
    ///
    /// Uses `RUNNER_TOOL_CACHE`, `RUNNER_TEMP` and `GITHUB_PATH` when set.
    pub fn from_env() -> Result<Self, AcquireError> {
        Ok(Installer::new(
            FileToolCache::from_env(),
            HttpAcquirer::from_env()?,
            TokioProcessRunner,
            RunnerSearchPath::from_env(),
        ))
    }
}

impl<C, A, R, P> Installer<C, A, R, P>
where
    C: ToolCache,
    A: Acquirer,
    R: ProcessRunner,
    P: SearchPath,
{
    /// Create an installer for the current host with the official
    /// download URLs.
    pub fn new(cache: C, acquirer: A, runner: R, search_path: P) -> Self {
        Self {
            cache,
            acquirer,
            runner,
            search_path,
            platform: Platform::current(),
            urls: DownloadUrls::default(),
        }
    }

    /// Override the host platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override the download URL templates.
    #[must_use]
    pub fn with_urls(mut self, urls: DownloadUrls) -> Self {
        self.urls = urls;
        self
    }

    /// Install Liquibase as described by `options`.
    ///
    /// Steps:
    /// 1. Validate the version and the edition's license requirement
    /// 2. Look for a cached installation
    /// 3. On a miss (or with caching disabled) download, extract and
    ///    optionally cache the distribution
    /// 4. Add the installation directory to the search path
    /// 5. Write the Pro license configuration
    /// 6. Run the installed launcher
    ///
    /// Each stage is reported to `on_progress`. Any failure aborts the whole
    /// run; nothing is retried.
    pub async fn setup<F>(
        &self,
        options: &SetupOptions,
        on_progress: F,
    ) -> Result<SetupResult, SetupError>
    where
        F: Fn(SetupProgress) + Send + Sync,
    {
        let edition = options.edition;
        on_progress(SetupProgress::Started { edition });

        // Step 1: Validate inputs before touching cache, network or disk
        on_progress(SetupProgress::Validating);
        let (version, license_key) = check_preconditions(options)?;

        // Step 2: Consult the cache
        let tool = edition.tool_identity();
        let cached = self.cache.find(&tool, &version);
        debug!(%tool, %version, hit = cached.is_some(), use_cache = options.cache, "Checked tool cache");

        // Step 3: Reuse or acquire
        let path = match cached.filter(|_| options.cache) {
            Some(path) => {
                info!(%edition, %version, "Found cached {} version {}", edition.display_name(), version);
                on_progress(SetupProgress::CacheHit { path: path.clone() });
                path
            }
            None => {
                info!(%edition, %version, "Installing {} version {}", edition.display_name(), version);
                self.acquire(&version, options, &on_progress).await?
            }
        };
        let location = InstallationLocation::new(path, self.platform);

        // Step 4: Publish the directory on the search path
        self.search_path
            .add_path(location.path())
            .map_err(|source| SetupError::SearchPathFailed {
                path: location.path().to_path_buf(),
                source,
            })?;
        on_progress(SetupProgress::PathPublished {
            path: location.path().to_path_buf(),
        });

        // Step 5: Configure edition extras
        if let Some(key) = license_key {
            on_progress(SetupProgress::Configuring);
            configure_pro(location.path(), key)
                .await
                .map_err(|source| SetupError::ConfigurationFailed {
                    path: location.path().join(crate::configure::PROPERTIES_FILE),
                    source,
                })?;
        }

        // Step 6: Verify the installation runs
        on_progress(SetupProgress::Verifying);
        validate_installation(&self.runner, &location).await?;

        let result = SetupResult {
            version,
            path: location.into_path(),
        };
        on_progress(SetupProgress::Completed {
            version: result.version.clone(),
            path: result.path.clone(),
        });
        Ok(result)
    }

    /// Download, extract and (when enabled) cache a distribution.
    ///
    /// Returns the authoritative installation directory: the cache entry
    /// when caching is enabled, the extraction directory otherwise.
    async fn acquire<F>(
        &self,
        version: &ResolvedVersion,
        options: &SetupOptions,
        on_progress: &F,
    ) -> Result<PathBuf, SetupError>
    where
        F: Fn(SetupProgress) + Send + Sync,
    {
        let url = self.urls.resolve(version, options.edition, self.platform);
        let failed = |source: AcquireError| SetupError::AcquisitionFailed {
            url: url.clone(),
            source,
        };

        on_progress(SetupProgress::Downloading { url: url.clone() });
        let archive = self.acquirer.download(&url).await.map_err(failed)?;

        on_progress(SetupProgress::Extracting);
        let extracted = match self.platform.archive_format() {
            ArchiveFormat::Zip => self.acquirer.extract_zip(&archive).await,
            ArchiveFormat::TarGz => self.acquirer.extract_tar_gz(&archive).await,
        }
        .map_err(failed)?;
        debug!(path = ?extracted, "Extracted Liquibase");
        self.acquirer.discard(&archive).await;

        if !options.cache {
            return Ok(extracted);
        }

        on_progress(SetupProgress::Caching);
        let tool = options.edition.tool_identity();
        let cached = self
            .cache
            .store(&extracted, &tool, version)
            .await
            .map_err(|source| SetupError::CacheFailed {
                tool: tool.to_string(),
                version: version.to_string(),
                source,
            })?;

        // The cache entry is authoritative from here on.
        if cached != extracted {
            self.acquirer.discard(&extracted).await;
        }
        Ok(cached)
    }
}

/// Validate the version, then the edition's license requirement.
///
/// Returns the resolved version and, for editions that need one, the
/// license key to configure.
fn check_preconditions(
    options: &SetupOptions,
) -> Result<(ResolvedVersion, Option<&str>), SetupError> {
    let version = validate_version(&options.version)?;
    let license_key = if options.edition.requires_license() {
        Some(
            options
                .usable_license_key()
                .ok_or(SetupError::MissingLicenseKey)?,
        )
    } else {
        None
    };
    Ok((version, license_key))
}

/// Install Liquibase on the current runner with the production
/// collaborators and no progress reporting.
///
/// # Example
///
/// ```rust,no_run
/// use setup_liquibase::{setup_liquibase, Edition, SetupOptions};
///
/// #[tokio::main]
/// async fn main() {
///     let options = SetupOptions::new("4.32.0", Edition::Oss);
///     match setup_liquibase(&options).await {
///         Ok(result) => println!("Installed at {:?}", result.path),
///         Err(e) => eprintln!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub async fn setup_liquibase(options: &SetupOptions) -> Result<SetupResult, SetupError> {
    let installer = match RunnerInstaller::from_env() {
        Ok(installer) => installer,
        Err(source) => {
            let (version, _) = check_preconditions(options)?;
            let url = DownloadUrls::default().resolve(&version, options.edition, Platform::current());
            return Err(SetupError::AcquisitionFailed { url, source });
        }
    };
    installer.setup(options, |_| {}).await
}
