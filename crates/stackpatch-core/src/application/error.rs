//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not patch
//! rules. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while installing or reverting a patch.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The shared filesystem state is unusable (poisoned lock).
    #[error("Filesystem state is unavailable")]
    FilesystemLock,

    /// The boilerplate tree for a patch is missing.
    #[error("Boilerplate not found at {path}")]
    BoilerplateMissing { path: PathBuf },

    /// The target is not a JavaScript project.
    #[error("No package.json found in {path}")]
    NotAProject { path: PathBuf },

    /// The directory for a new project already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The user declined to overwrite existing files.
    #[error("Installation aborted: {} existing file(s) would be overwritten", conflicts.len())]
    ConflictDeclined { conflicts: Vec<String> },

    /// The configuration collector was cancelled.
    #[error("Configuration was cancelled")]
    Cancelled,

    /// A file could not be (de)serialized.
    #[error("Could not serialize {what}: {reason}")]
    Serialization { what: String, reason: String },

    /// An external program failed.
    #[error("Command `{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::BoilerplateMissing { path } => vec![
                format!("Expected boilerplate files under {}", path.display()),
                "Set STACKPATCH_BOILERPLATE_DIR to the boilerplate directory".into(),
                "Or pass --boilerplate-dir <DIR>".into(),
            ],
            Self::NotAProject { path } => vec![
                format!("'{}' does not contain a package.json", path.display()),
                "Run the command from your Next.js project root".into(),
                "Or create a new project: stackpatch create my-app".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory '{}' already exists", path.display()),
                "Choose a different project name".into(),
                "Or add a patch to it: stackpatch add auth <DIR>".into(),
            ],
            Self::ConflictDeclined { conflicts } => {
                let mut out = vec!["No files were changed".into(), "Conflicting files:".into()];
                out.extend(conflicts.iter().map(|c| format!("  • {c}")));
                out.push("Re-run with --yes to overwrite them (originals are restored on revert)".into());
                out
            }
            Self::Cancelled => vec!["No files were changed".into()],
            Self::ExternalCommand { command, .. } => vec![
                format!("Run it manually: {command}"),
                "Ensure the command is installed and in your PATH".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::FilesystemLock => ErrorCategory::Internal,
            Self::BoilerplateMissing { .. } => ErrorCategory::NotFound,
            Self::NotAProject { .. } => ErrorCategory::Configuration,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::ConflictDeclined { .. } | Self::Cancelled => ErrorCategory::Validation,
            Self::Serialization { .. } | Self::ExternalCommand { .. } => ErrorCategory::Internal,
        }
    }
}
