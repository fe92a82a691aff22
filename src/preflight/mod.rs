//! Preflight checks before staging the JDK module.
//!
//! Catches a wrong `jdkbase` before anything is written to the staging
//! tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use jdk_module::config::JdkConfig;
//! use jdk_module::preflight::check_jdk;
//!
//! let jdk = JdkConfig::new("/usr/lib/jvm/java-17-openjdk").unwrap();
//! for warning in check_jdk(&jdk).unwrap() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

use anyhow::{bail, Result};

use crate::config::JdkConfig;

/// Subdirectories the module copies from. Missing ones only warn, since
/// an include that matches nothing is accepted.
pub const EXPECTED_SUBDIRS: &[&str] = &["lib", "jre"];

/// Check that the JDK base is an existing directory.
///
/// # Returns
///
/// * `Ok(warnings)` - one line per expected subdirectory that is missing
/// * `Err` if the base is missing or not a directory
pub fn check_jdk(jdk: &JdkConfig) -> Result<Vec<String>> {
    let base = jdk.jdkbase();
    if !base.exists() {
        bail!("JDK base '{}' does not exist", base.display());
    }
    if !base.is_dir() {
        bail!("JDK base '{}' is not a directory", base.display());
    }

    Ok(EXPECTED_SUBDIRS
        .iter()
        .filter(|sub| !base.join(sub).is_dir())
        .map(|sub| format!("{} has no {}/ directory", base.display(), sub))
        .collect())
}
