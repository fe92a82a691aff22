//! JDK location and the optional TOML config file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved JDK location handed to the java module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkConfig {
    jdkbase: PathBuf,
}

impl JdkConfig {
    /// Validate a JDK base path.
    ///
    /// The basename names the JDK inside the image, so an empty path or
    /// one without a final component (e.g. `/`) is rejected.
    pub fn new(jdkbase: impl Into<PathBuf>) -> Result<Self> {
        let jdkbase = jdkbase.into();
        if jdkbase.as_os_str().to_string_lossy().trim().is_empty() {
            bail!("jdkbase is empty; set it to the installed JDK directory");
        }
        match jdkbase.file_name() {
            Some(name) if name.to_str().is_none() => bail!(
                "jdkbase '{}' has a directory name that is not valid UTF-8",
                jdkbase.display()
            ),
            Some(name) if !name.is_empty() => Ok(Self { jdkbase }),
            _ => bail!(
                "jdkbase '{}' has no directory name to install under /usr/lib/jvm",
                jdkbase.display()
            ),
        }
    }

    pub fn jdkbase(&self) -> &Path {
        &self.jdkbase
    }

    /// Basename of the JDK base, e.g. `jdk-17` for `/opt/jdk-17`.
    pub fn jdk_dir(&self) -> &str {
        self.jdkbase
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleToml {
    java: JavaToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JavaToml {
    jdkbase: String,
}

/// Load `[java] jdkbase` from a TOML file.
///
/// Relative paths resolve against the file's directory.
pub fn load_config(path: &Path) -> Result<JdkConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading module config '{}'", path.display()))?;
    parse_config(&raw, path.parent().unwrap_or_else(|| Path::new(".")))
        .with_context(|| format!("parsing module config '{}'", path.display()))
}

fn parse_config(raw: &str, base_dir: &Path) -> Result<JdkConfig> {
    let parsed: ModuleToml = toml::from_str(raw)?;
    let jdkbase = parsed.java.jdkbase.trim();
    if jdkbase.is_empty() {
        return JdkConfig::new(jdkbase);
    }
    let path = Path::new(jdkbase);
    if path.is_absolute() {
        JdkConfig::new(path)
    } else {
        JdkConfig::new(base_dir.join(path))
    }
}
