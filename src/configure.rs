//! Pro edition license configuration.

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Properties file written into the installation directory.
pub const PROPERTIES_FILE: &str = "liquibase.properties";

/// Property name holding the Pro license key.
pub const LICENSE_KEY_PROPERTY: &str = "liquibase.licenseKey";

/// Write the Pro license key into `install_dir/liquibase.properties`.
///
/// The file always contains exactly one `liquibase.licenseKey=<key>` line
/// and is overwritten unconditionally, so writing the same key twice yields
/// byte-identical content. Returns the path of the written file.
///
/// The key itself is never logged.
pub async fn configure_pro(install_dir: &Path, license_key: &str) -> io::Result<PathBuf> {
    let path = install_dir.join(PROPERTIES_FILE);
    tokio::fs::write(&path, properties_content(license_key)).await?;
    info!(path = ?path, "Configured Liquibase Pro license key");
    Ok(path)
}

fn properties_content(license_key: &str) -> String {
    format!("{LICENSE_KEY_PROPERTY}={license_key}\n")
}
