//! Symlink handling for staging ops.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Replace whatever is at `link` with a symlink to `target`.
///
/// Presence is checked lexically, so broken symlinks are replaced too.
/// Parent directories must already exist. An existing directory at `link`
/// is not removed and the call fails with the underlying I/O error.
pub fn symlink_force(target: &str, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link)
            .with_context(|| format!("removing existing '{}'", link.display()))?;
    }
    std::os::unix::fs::symlink(target, link)
        .with_context(|| format!("creating symlink '{}' -> '{}'", link.display(), target))?;
    Ok(())
}
