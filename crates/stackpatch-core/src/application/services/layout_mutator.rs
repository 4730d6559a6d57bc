//! Idempotent edits to the root layout.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::manifest_store::backup_path;
use crate::application::ports::Filesystem;
use crate::domain::{LayoutEdit, ProjectLayout};
use crate::error::StackPatchResult;

const LAYOUT_FILES: &[&str] = &["layout.tsx", "layout.jsx", "layout.js"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMutation {
    /// `false` when the edit was already present.
    pub modified: bool,
    pub file_path: String,
    /// The file before this edit.
    pub original_content: String,
    /// Set when this call created the backup.
    pub backup_path: Option<String>,
}

pub struct LayoutMutator {
    filesystem: Arc<dyn Filesystem>,
}

impl LayoutMutator {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Project-relative path of the root layout, if there is one.
    pub fn find_layout(&self, target: &Path, layout: &ProjectLayout) -> Option<String> {
        LAYOUT_FILES
            .iter()
            .map(|name| format!("{}/{name}", layout.app_dir))
            .find(|path| self.filesystem.exists(&target.join(path)))
    }

    /// Apply `edit` to `file`.
    ///
    /// The first mutation of a file backs it up under `.stackpatch/backups/`;
    /// an existing backup is never replaced, so it always holds the text from
    /// before the first installation.
    #[instrument(skip_all, fields(file = %file, component = %edit.component))]
    pub fn mutate(&self, target: &Path, file: &str, edit: &LayoutEdit) -> StackPatchResult<LayoutMutation> {
        let path = target.join(file);
        let original_content = self.filesystem.read_to_string(&path)?;

        let Some(edited) = edit.apply(&original_content, file)? else {
            debug!("Already applied");
            return Ok(LayoutMutation {
                modified: false,
                file_path: file.to_string(),
                original_content,
                backup_path: None,
            });
        };

        let backup = backup_path(file);
        let backup_full = target.join(&backup);
        let backup_path = if self.filesystem.exists(&backup_full) {
            None
        } else {
            self.filesystem.write_file_all(&backup_full, &original_content)?;
            debug!(backup = %backup, "Backed up");
            Some(backup)
        };

        self.filesystem.write_file(&path, &edited)?;
        info!("Layout updated");
        Ok(LayoutMutation {
            modified: true,
            file_path: file.to_string(),
            original_content,
            backup_path,
        })
    }
}
