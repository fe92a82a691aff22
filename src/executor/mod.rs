//! Staging executor - interprets [`Op`] values against a build root.
//!
//! # Usage
//!
//! ```rust,ignore
//! use jdk_module::executor;
//! use std::path::Path;
//!
//! let descriptor = jdk_module::describe(&module)?;
//! executor::apply(Path::new("."), &descriptor)?;
//! ```

pub mod directories;
pub mod files;

use anyhow::{Context, Result};
use std::path::Path;

use crate::component::{ModuleDescriptor, Op};

/// Execute one staging operation relative to `root`.
pub fn execute_op(root: &Path, op: &Op) -> Result<()> {
    match op {
        Op::Dir { path } => directories::ensure_dir(root, path)?,
        Op::Symlink { link, target } => files::symlink_force(target, &root.join(link))?,
    }

    Ok(())
}

/// Run every staging op of a module in order.
///
/// Stops at the first failure. Ops already applied are left in place.
pub fn apply(root: &Path, descriptor: &ModuleDescriptor) -> Result<()> {
    for op in &descriptor.staging_ops {
        execute_op(root, op)
            .with_context(|| format!("staging module '{}'", descriptor.name))?;
    }
    Ok(())
}
