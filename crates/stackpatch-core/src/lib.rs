//! StackPatch Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for StackPatch,
//! which installs feature patches (currently `auth`) into Next.js projects
//! and reverts them from a manifest.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         stackpatch-cli (CLI)            │
//! │   (collectors, prompts, output)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (PatchInstaller, RevertEngine, ...)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, DependencyInstaller, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stackpatch-adapters (Infrastructure) │
//! │ (LocalFilesystem, MemoryFilesystem, ...)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (AuthConfig, Manifest, renderers, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stackpatch_core::prelude::*;
//!
//! let installer = PatchInstaller::new(Arc::clone(&fs), Box::new(npm));
//! let outcome = installer.install(&request, &collector, &resolver)?;
//! println!("{} files added", outcome.manifest.files.added.len());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InstallOutcome, InstallRequest, PatchInstaller, ProjectCreator, RevertEngine,
        RevertReport,
        ports::{
            ConfigCollector, ConflictResolver, DependencyInstaller, Filesystem,
            ProjectBootstrapper,
        },
    };
    pub use crate::domain::{
        AuthConfig, DatabaseKind, OAuthProvider, OrmKind, PackageManager, PatchName,
        ProjectScan, SessionMode, StackPatchManifest,
    };
    pub use crate::error::{StackPatchError, StackPatchResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
