//! Declarative module descriptors for the disk-image build.
//!
//! A module describes WHAT it contributes to the image, not HOW. It
//! names the modules that must be materialized before it, the staging
//! operations to run on the build host, and the copy rules that pull
//! host files into the image. The executor interprets the staging ops;
//! the orchestrator merges the copy rules.
//!
//! # Example
//!
//! ```rust
//! use jdk_module::component::{describe, dir, Module, Op};
//! use jdk_module::filemap::FileMap;
//!
//! struct Motd;
//!
//! impl Module for Motd {
//!     fn name(&self) -> &str { "motd" }
//!     fn requires(&self) -> Vec<String> { Vec::new() }
//!     fn staging_ops(&self) -> Vec<Op> { vec![dir("diskimage/etc")] }
//!     fn usr_files(&self) -> anyhow::Result<FileMap> {
//!         let mut files = FileMap::new();
//!         files.add("/build/motd").to("/etc/motd");
//!         Ok(files)
//!     }
//! }
//!
//! let descriptor = describe(&Motd).unwrap();
//! assert_eq!(descriptor.usr_files.len(), 1);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::filemap::FileMap;

/// Anything that contributes files to the image.
pub trait Module {
    /// Name for logging and for other modules' `requires`.
    fn name(&self) -> &str;

    /// Modules that must be materialized before this one.
    fn requires(&self) -> Vec<String>;

    /// Operations to run on the build host's staging tree.
    fn staging_ops(&self) -> Vec<Op>;

    /// Copy rules contributed to the image.
    fn usr_files(&self) -> Result<FileMap>;
}

/// Staging operations, relative to the build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Ensure a directory and its parents exist.
    Dir { path: String },

    /// Replace whatever is at `link` with a symlink to `target`.
    Symlink { link: String, target: String },
}

/// Ensure a directory.
pub fn dir(path: impl Into<String>) -> Op {
    Op::Dir { path: path.into() }
}

/// Force a symlink.
pub fn symlink(link: impl Into<String>, target: impl Into<String>) -> Op {
    Op::Symlink {
        link: link.into(),
        target: target.into(),
    }
}

/// Immutable snapshot of everything a module contributes.
///
/// This is the value handed to the orchestrator. Nothing in it is shared
/// or written to after [`describe`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub requires: Vec<String>,
    pub staging_ops: Vec<Op>,
    pub usr_files: FileMap,
}

/// Evaluate a module into its descriptor.
pub fn describe(module: &dyn Module) -> Result<ModuleDescriptor> {
    let usr_files = module
        .usr_files()
        .with_context(|| format!("collecting files for module '{}'", module.name()))?;

    Ok(ModuleDescriptor {
        name: module.name().to_string(),
        requires: module.requires(),
        staging_ops: module.staging_ops(),
        usr_files,
    })
}

/// Record a dependency on another module.
///
/// Ordering is enforced by the orchestrator; this only names the module.
pub fn require(requires: &mut Vec<String>, name: impl Into<String>) {
    let name = name.into();
    if !requires.contains(&name) {
        requires.push(name);
    }
}
