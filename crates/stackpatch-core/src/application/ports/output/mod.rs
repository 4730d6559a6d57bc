//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stackpatch-adapters` crate provides the filesystem, installer and
//! bootstrapper; the CLI provides the collectors and conflict resolvers.

use std::path::{Path, PathBuf};

use crate::domain::{AuthConfig, PackageManager, ProjectScan};
use crate::error::StackPatchResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stackpatch_adapters::filesystem::LocalFilesystem` (production)
/// - `stackpatch_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are absolute (or relative to the process working directory).
/// Services join project-relative `/` paths onto the target root before
/// calling in.
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> StackPatchResult<String>;

    /// Write content to a file, replacing it. The parent must exist.
    fn write_file(&self, path: &Path, content: &str) -> StackPatchResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StackPatchResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> StackPatchResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> StackPatchResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StackPatchResult<()>;

    /// Immediate children of a directory, sorted.
    fn read_dir(&self, path: &Path) -> StackPatchResult<Vec<PathBuf>>;

    /// Copy a file, replacing the destination. The parent must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> StackPatchResult<()>;

    /// Every file below `root`, as sorted paths relative to `root`.
    fn walk_files(&self, root: &Path) -> StackPatchResult<Vec<PathBuf>>;

    /// Write a file, creating parent directories first.
    fn write_file_all(&self, path: &Path, content: &str) -> StackPatchResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        self.write_file(path, content)
    }
}

/// Decides whether existing destination files may be overwritten.
pub trait ConflictResolver {
    /// `conflicts` are project-relative paths. Returning `false` aborts the
    /// copy before anything is written.
    fn confirm_overwrite(&self, conflicts: &[String]) -> bool;
}

/// Port for adding packages with the project's package manager.
pub trait DependencyInstaller {
    fn install(
        &self,
        target: &Path,
        packages: &[String],
        package_manager: PackageManager,
    ) -> StackPatchResult<()>;
}

/// Gathers the auth configuration for a project.
pub trait ConfigCollector {
    /// `Ok(None)` means the user cancelled.
    fn collect(&self, scan: &ProjectScan) -> StackPatchResult<Option<AuthConfig>>;
}

/// Port for creating a fresh Next.js project.
pub trait ProjectBootstrapper {
    /// Create `name` under `parent` and return the project root.
    fn bootstrap(
        &self,
        parent: &Path,
        name: &str,
        package_manager: PackageManager,
    ) -> StackPatchResult<PathBuf>;
}
