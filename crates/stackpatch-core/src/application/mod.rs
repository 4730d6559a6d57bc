//! Application layer for StackPatch.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (PatchInstaller, RevertEngine and
//!   the components they are built from)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Services coordinate the domain layer and perform all I/O through the
//! ports. Patch rules and source rendering live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CodeGenerator, CopyOutcome, FileCopier, GeneratedFile, InstallOutcome, InstallRequest,
    LayoutMutation, LayoutMutator, ManifestStore, PatchInstaller, PathResolver, ProjectCreator,
    ProjectScanner, RevertEngine, RevertReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ConfigCollector, ConflictResolver, DependencyInstaller, Filesystem, ProjectBootstrapper,
};

pub use error::ApplicationError;
