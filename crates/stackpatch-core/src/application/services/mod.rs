//! Application services - use case orchestration.

pub mod dependencies;
pub mod file_copier;
pub mod generator;
pub mod installer;
pub mod layout_mutator;
pub mod manifest_store;
pub mod path_resolver;
pub mod project_creator;
pub mod revert;
pub mod scanner;

pub use file_copier::{CopyEntry, CopyOutcome, FileCopier};
pub use generator::{CodeGenerator, EnvOutcome, GeneratedFile, RouteGuardOutcome};
pub use installer::{InstallOutcome, InstallRequest, PatchInstaller};
pub use layout_mutator::{LayoutMutation, LayoutMutator};
pub use manifest_store::ManifestStore;
pub use path_resolver::PathResolver;
pub use project_creator::ProjectCreator;
pub use revert::{RevertEngine, RevertReport};
pub use scanner::ProjectScanner;

use std::path::{Component, Path};

/// A relative path as a `/`-separated string, the form used in the
/// manifest and in import specifiers.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
