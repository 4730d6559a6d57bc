//! Infrastructure adapters for StackPatch.
//!
//! This crate implements the ports defined in
//! `stackpatch-core::application::ports`. It contains all direct I/O:
//! filesystem access, child processes and boilerplate discovery.

pub mod boilerplate;
pub mod filesystem;
pub mod process;
pub mod resolver;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{CreateNextAppBootstrapper, ProcessDependencyInstaller};
pub use resolver::StaticConflictResolver;
