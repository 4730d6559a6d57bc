//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stackpatch-adapters` and the
//! CLI implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `DependencyInstaller`: Package manager invocation
//!   - `ProjectBootstrapper`: New project creation
//!   - `ConfigCollector`: Gathering the auth configuration (flags or prompts)
//!   - `ConflictResolver`: Deciding whether to overwrite existing files

pub mod output;

pub use output::{
    ConfigCollector, ConflictResolver, DependencyInstaller, Filesystem, ProjectBootstrapper,
};
