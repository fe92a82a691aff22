//! JDK packaging module for the disk-image builder.
//!
//! The java module declares that `fonts` must be built first, stages
//! `java` and `jre` symlinks under `diskimage/usr/lib/jvm`, and
//! contributes the copy rules that pull the JDK into `/usr/lib/jvm`.
//!
//! # Architecture
//!
//! ```text
//! jdk-module (this crate)
//!     │
//!     ├── component  Module trait, Op, ModuleDescriptor
//!     ├── filemap    FileMap / Mapping copy rules, glob matching
//!     ├── executor   applies staging ops (dirs, forced symlinks)
//!     ├── config     JdkConfig, TOML module config
//!     ├── preflight  JDK base checks
//!     └── modules    JavaModule
//! ```
//!
//! Modules never touch shared state: [`describe`] returns an immutable
//! [`ModuleDescriptor`] that the orchestrator merges with the others.
//!
//! # Example
//!
//! ```rust,no_run
//! use jdk_module::{describe, executor, JavaModule, JdkConfig};
//!
//! let jdk = JdkConfig::new("/opt/jdk-17")?;
//! let module = JavaModule::new(jdk, std::env::current_dir()?);
//! let descriptor = describe(&module)?;
//! executor::apply(std::path::Path::new("."), &descriptor)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod component;
pub mod config;
pub mod executor;
pub mod filemap;
pub mod modules;
pub mod preflight;

pub use component::{describe, Module, ModuleDescriptor, Op};
pub use config::JdkConfig;
pub use filemap::{FileMap, Mapping};
pub use modules::JavaModule;
