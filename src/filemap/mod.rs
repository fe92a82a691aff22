//! Source-to-image copy rules.
//!
//! A [`FileMap`] is an ordered list of [`Mapping`] records. Each record
//! copies a host tree (or a single file) to a path inside the image,
//! optionally narrowed by include/exclude glob patterns relative to the
//! source root.
//!
//! ```rust
//! use jdk_module::filemap::FileMap;
//!
//! let mut files = FileMap::new();
//! files
//!     .add("/opt/jdk-17")
//!     .to("/usr/lib/jvm/jdk-17")
//!     .include("lib/**")
//!     .exclude("lib/security/cacerts");
//!
//! let mapping = &files.mappings()[0];
//! assert!(mapping.matches("lib/rt.jar").unwrap());
//! assert!(!mapping.matches("lib/security/cacerts").unwrap());
//! assert!(!mapping.matches("bin/java").unwrap());
//! ```

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `*` stays within one path component; `**` crosses directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One copy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    /// Absolute path on the build host.
    pub source: PathBuf,
    /// Absolute path inside the image.
    pub destination: String,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl Mapping {
    /// Without `.to()`, the destination is the source path. A non-UTF-8
    /// source leaves it empty and `resolve` refuses the rule.
    fn new(source: PathBuf) -> Self {
        let destination = source.to_str().map(String::from).unwrap_or_default();
        Self {
            source,
            destination,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Set the destination inside the image.
    pub fn to(&mut self, destination: impl Into<String>) -> &mut Self {
        self.destination = destination.into();
        self
    }

    /// Add an include pattern, relative to the source root.
    pub fn include(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.includes.push(pattern.into());
        self
    }

    /// Add an exclude pattern, relative to the source root.
    pub fn exclude(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Whether `relative` (slash separated, relative to the source root)
    /// is selected by this rule.
    ///
    /// No includes means everything is included. Excludes always win.
    pub fn matches(&self, relative: &str) -> Result<bool> {
        let included = self.includes.is_empty() || any_match(&self.includes, relative)?;
        if !included {
            return Ok(false);
        }
        Ok(!any_match(&self.excludes, relative)?)
    }

    fn has_patterns(&self) -> bool {
        !self.includes.is_empty() || !self.excludes.is_empty()
    }

    /// Expand this rule against the host filesystem.
    ///
    /// A rule without patterns whose source is a symlink copies the link
    /// itself. With patterns, a symlinked source root is followed; links
    /// below the root are never followed.
    pub fn resolve(&self) -> Result<Vec<ResolvedFile>> {
        if self.destination.is_empty() {
            bail!(
                "rule for '{}' has no image destination; set one with .to()",
                self.source.display()
            );
        }

        let meta = if self.has_patterns() {
            fs::metadata(&self.source)
        } else {
            fs::symlink_metadata(&self.source)
        }
        .with_context(|| format!("reading source '{}'", self.source.display()))?;

        if !meta.is_dir() {
            return Ok(vec![ResolvedFile {
                source: self.source.clone(),
                destination: self.destination.clone(),
            }]);
        }

        let mut selected = Vec::new();
        let walker = WalkDir::new(&self.source)
            .follow_root_links(true)
            .follow_links(false)
            .min_depth(1);
        for entry in walker {
            let entry = entry
                .with_context(|| format!("walking source '{}'", self.source.display()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            let relative = relative_slash_path(&self.source, entry.path())?;
            if self.matches(&relative)? {
                selected.push((relative, entry.into_path()));
            }
        }
        selected.sort_by(|a, b| a.0.cmp(&b.0));

        let root = self.destination.trim_end_matches('/');
        Ok(selected
            .into_iter()
            .map(|(relative, source)| ResolvedFile {
                source,
                destination: format!("{root}/{relative}"),
            })
            .collect())
    }
}

/// A concrete host file and where it lands in the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFile {
    pub source: PathBuf,
    pub destination: String,
}

/// Ordered set of copy rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileMap {
    mappings: Vec<Mapping>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule copying `source`. Chain `.to()`, `.include()` and
    /// `.exclude()` on the returned record.
    pub fn add(&mut self, source: impl Into<PathBuf>) -> &mut Mapping {
        self.mappings.push(Mapping::new(source.into()));
        let last = self.mappings.len() - 1;
        &mut self.mappings[last]
    }

    /// Append another map's rules after ours.
    pub fn extend(&mut self, other: FileMap) {
        self.mappings.extend(other.mappings);
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Expand every rule, in rule order.
    pub fn resolve(&self) -> Result<Vec<ResolvedFile>> {
        let mut files = Vec::new();
        for mapping in &self.mappings {
            files.extend(mapping.resolve()?);
        }
        Ok(files)
    }
}

impl<'a> IntoIterator for &'a FileMap {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

fn any_match(patterns: &[String], relative: &str) -> Result<bool> {
    for raw in patterns {
        let pattern =
            Pattern::new(raw).with_context(|| format!("invalid file pattern '{raw}'"))?;
        if pattern.matches_with(relative, MATCH_OPTIONS) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Join the components under `root` with `/`. Backslashes are ordinary
/// file-name bytes here.
fn relative_slash_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .with_context(|| format!("file name '{}' is not valid UTF-8", path.display()))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
