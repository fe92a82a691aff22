//! The JDK module.
//!
//! Copies the JDK's `lib` and `jre` trees to `/usr/lib/jvm/<jdk>` and
//! exposes it through `java` and `jre` symlinks staged under
//! `diskimage/usr/lib/jvm`. Fonts must be in the image first.

use anyhow::Result;
use std::path::PathBuf;

use crate::component::{dir, require, symlink, Module, Op};
use crate::config::JdkConfig;
use crate::filemap::FileMap;

/// Staging directory holding the `java`/`jre` links, relative to the build root.
pub const JVM_STAGING_DIR: &str = "diskimage/usr/lib/jvm";

/// Image directory the JDK lands under.
pub const JVM_IMAGE_DIR: &str = "/usr/lib/jvm";

pub struct JavaModule {
    jdk: JdkConfig,
    build_root: PathBuf,
}

impl JavaModule {
    /// `build_root` is the directory `diskimage/` lives in, normally the
    /// current directory of the build.
    pub fn new(jdk: JdkConfig, build_root: impl Into<PathBuf>) -> Self {
        Self {
            jdk,
            build_root: build_root.into(),
        }
    }

    pub fn jdk_dir(&self) -> &str {
        self.jdk.jdk_dir()
    }

    fn staged_link(&self, name: &str) -> PathBuf {
        self.build_root.join(JVM_STAGING_DIR).join(name)
    }
}

impl Module for JavaModule {
    fn name(&self) -> &str {
        "java"
    }

    fn requires(&self) -> Vec<String> {
        let mut requires = Vec::new();
        require(&mut requires, "fonts");
        requires
    }

    fn staging_ops(&self) -> Vec<Op> {
        let jdk_dir = self.jdk_dir();
        vec![
            dir(JVM_STAGING_DIR),
            symlink(format!("{JVM_STAGING_DIR}/java"), jdk_dir),
            symlink(format!("{JVM_STAGING_DIR}/jre"), format!("{jdk_dir}/jre")),
        ]
    }

    fn usr_files(&self) -> Result<FileMap> {
        let mut files = FileMap::new();
        files
            .add(self.jdk.jdkbase())
            .to(format!("{JVM_IMAGE_DIR}/{}", self.jdk_dir()))
            .include("lib/**")
            .include("jre/**")
            .exclude("jre/lib/security/cacerts")
            .exclude("jre/lib/audio/**");
        files
            .add(self.staged_link("java"))
            .to(format!("{JVM_IMAGE_DIR}/java"));
        files
            .add(self.staged_link("jre"))
            .to(format!("{JVM_IMAGE_DIR}/jre"));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::describe;
    use crate::executor;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn module(jdkbase: &str, root: &Path) -> JavaModule {
        JavaModule::new(JdkConfig::new(jdkbase).unwrap(), root)
    }

    #[test]
    fn test_requires_fonts() {
        let m = module("/opt/jdk-17", Path::new("/build"));
        assert_eq!(m.name(), "java");
        assert_eq!(m.requires(), vec!["fonts".to_string()]);
    }

    #[test]
    fn test_staging_ops_point_into_jdk_dir() {
        let m = module("/opt/jdk-17", Path::new("/build"));
        assert_eq!(
            m.staging_ops(),
            vec![
                dir("diskimage/usr/lib/jvm"),
                symlink("diskimage/usr/lib/jvm/java", "jdk-17"),
                symlink("diskimage/usr/lib/jvm/jre", "jdk-17/jre"),
            ]
        );
    }

    #[test]
    fn test_usr_files_rules() {
        let m = module("/opt/jdk-17", Path::new("/build"));
        let files = m.usr_files().unwrap();
        let rules = files.mappings();

        assert_eq!(rules.len(), 3);

        assert_eq!(rules[0].source, PathBuf::from("/opt/jdk-17"));
        assert_eq!(rules[0].destination, "/usr/lib/jvm/jdk-17");
        assert_eq!(rules[0].includes, vec!["lib/**", "jre/**"]);
        assert_eq!(
            rules[0].excludes,
            vec!["jre/lib/security/cacerts", "jre/lib/audio/**"]
        );

        assert_eq!(
            rules[1].source,
            PathBuf::from("/build/diskimage/usr/lib/jvm/java")
        );
        assert_eq!(rules[1].destination, "/usr/lib/jvm/java");
        assert!(rules[1].includes.is_empty() && rules[1].excludes.is_empty());

        assert_eq!(
            rules[2].source,
            PathBuf::from("/build/diskimage/usr/lib/jvm/jre")
        );
        assert_eq!(rules[2].destination, "/usr/lib/jvm/jre");
    }

    #[test]
    fn test_staging_creates_links() {
        let temp = TempDir::new().unwrap();
        let m = module("/opt/jdk-17", temp.path());

        let descriptor = describe(&m).unwrap();
        executor::apply(temp.path(), &descriptor).unwrap();

        let jvm = temp.path().join("diskimage/usr/lib/jvm");
        assert_eq!(fs::read_link(jvm.join("java")).unwrap(), Path::new("jdk-17"));
        assert_eq!(
            fs::read_link(jvm.join("jre")).unwrap(),
            Path::new("jdk-17/jre")
        );
    }

    #[test]
    fn test_restaging_replaces_previous_jdk() {
        let temp = TempDir::new().unwrap();

        let old = describe(&module("/opt/jdk-11", temp.path())).unwrap();
        executor::apply(temp.path(), &old).unwrap();
        let new = describe(&module("/opt/jdk-17", temp.path())).unwrap();
        executor::apply(temp.path(), &new).unwrap();

        let jvm = temp.path().join("diskimage/usr/lib/jvm");
        assert_eq!(fs::read_link(jvm.join("java")).unwrap(), Path::new("jdk-17"));
        assert_eq!(
            fs::read_link(jvm.join("jre")).unwrap(),
            Path::new("jdk-17/jre")
        );
    }

    #[test]
    fn test_symlinked_jdk_base_keeps_filters() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("java-17-openjdk-amd64");
        fs::create_dir_all(real.join("lib")).unwrap();
        fs::create_dir_all(real.join("jre/lib/security")).unwrap();
        fs::write(real.join("lib/tools.jar"), "tools").unwrap();
        fs::write(real.join("jre/lib/security/cacerts"), "certs").unwrap();
        fs::write(real.join("jre/lib/security/java.policy"), "policy").unwrap();
        let default_java = temp.path().join("default-java");
        std::os::unix::fs::symlink(&real, &default_java).unwrap();

        let m = JavaModule::new(JdkConfig::new(&default_java).unwrap(), temp.path());
        let files = m.usr_files().unwrap();
        let resolved = files.mappings()[0].resolve().unwrap();

        let destinations: Vec<_> = resolved.iter().map(|f| f.destination.as_str()).collect();
        assert_eq!(
            destinations,
            vec![
                "/usr/lib/jvm/default-java/jre/lib/security/java.policy",
                "/usr/lib/jvm/default-java/lib/tools.jar",
            ]
        );
        assert_eq!(resolved[1].source, default_java.join("lib/tools.jar"));
    }

    #[test]
    fn test_staged_links_resolve_into_image() {
        let temp = TempDir::new().unwrap();
        let jdk = temp.path().join("jdk-17");
        fs::create_dir_all(jdk.join("jre/lib/audio")).unwrap();
        fs::create_dir_all(jdk.join("lib")).unwrap();
        fs::write(jdk.join("jre/lib/rt.jar"), "rt").unwrap();
        fs::write(jdk.join("jre/lib/audio/default.sf2"), "sf2").unwrap();
        fs::write(jdk.join("lib/tools.jar"), "tools").unwrap();

        let m = JavaModule::new(JdkConfig::new(&jdk).unwrap(), temp.path());
        let descriptor = describe(&m).unwrap();
        executor::apply(temp.path(), &descriptor).unwrap();

        let destinations: Vec<_> = descriptor
            .usr_files
            .resolve()
            .unwrap()
            .into_iter()
            .map(|f| f.destination)
            .collect();

        assert_eq!(
            destinations,
            vec![
                "/usr/lib/jvm/jdk-17/jre/lib/rt.jar",
                "/usr/lib/jvm/jdk-17/lib/tools.jar",
                "/usr/lib/jvm/java",
                "/usr/lib/jvm/jre",
            ]
        );
    }
}
