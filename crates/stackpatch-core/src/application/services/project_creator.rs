//! `stackpatch create`: a fresh Next.js project.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::{
    ApplicationError,
    ports::{Filesystem, ProjectBootstrapper},
};
use crate::domain::{DomainError, PackageManager};
use crate::error::StackPatchResult;

pub struct ProjectCreator {
    filesystem: Arc<dyn Filesystem>,
    bootstrapper: Box<dyn ProjectBootstrapper>,
}

impl ProjectCreator {
    pub fn new(filesystem: Arc<dyn Filesystem>, bootstrapper: Box<dyn ProjectBootstrapper>) -> Self {
        Self {
            filesystem,
            bootstrapper,
        }
    }

    /// Create `name` under `parent` and return its root.
    #[instrument(skip_all, fields(name = %name, package_manager = %package_manager))]
    pub fn create(
        &self,
        parent: &Path,
        name: &str,
        package_manager: PackageManager,
    ) -> StackPatchResult<PathBuf> {
        validate_project_name(name)?;

        let root = parent.join(name);
        if self.filesystem.exists(&root) {
            return Err(ApplicationError::ProjectExists { path: root }.into());
        }

        let created = self.bootstrapper.bootstrap(parent, name, package_manager)?;
        if !self.filesystem.exists(&created.join("package.json")) {
            return Err(ApplicationError::NotAProject { path: created }.into());
        }
        info!(root = %created.display(), "Project created");
        Ok(created)
    }
}

/// npm package name rules that matter for a directory name.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |value: &str| DomainError::InvalidValue {
        field: "project name",
        value: value.into(),
    };

    if name.is_empty() || name.len() > 214 || name.starts_with('.') || name.starts_with('_') {
        return Err(invalid(name));
    }
    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.');
    if !name.chars().all(allowed) {
        return Err(invalid(name));
    }
    Ok(())
}
