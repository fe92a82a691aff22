//! Directory handling for staging ops.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Handle Op::Dir: ensure `path` (relative to `root`) and its parents exist.
///
/// Idempotent. Fails if something other than a directory is in the way.
pub fn ensure_dir(root: &Path, path: &str) -> Result<()> {
    let full_path = root.join(path);
    if !full_path.is_dir() {
        fs::create_dir_all(&full_path)
            .with_context(|| format!("creating directory '{}'", full_path.display()))?;
    }
    Ok(())
}
