//! Modules shipped by this crate.

pub mod java;

pub use java::JavaModule;
