//! Reading and writing `.stackpatch/manifest.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::ports::Filesystem;
use crate::domain::{MANIFEST_VERSION, StackPatchManifest};
use crate::error::{Context, StackPatchResult};

/// Per-project state directory.
pub const STATE_DIR: &str = ".stackpatch";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const BACKUP_DIR: &str = "backups";

/// Project-relative backup location for `file`: `app/layout.tsx` becomes
/// `.stackpatch/backups/app_layout.tsx`.
pub fn backup_path(file: &str) -> String {
    format!("{STATE_DIR}/{BACKUP_DIR}/{}", file.replace('/', "_"))
}

pub struct ManifestStore {
    filesystem: Arc<dyn Filesystem>,
}

impl ManifestStore {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    pub fn manifest_path(target: &Path) -> PathBuf {
        target.join(STATE_DIR).join(MANIFEST_FILE)
    }

    pub fn exists(&self, target: &Path) -> bool {
        self.filesystem.exists(&Self::manifest_path(target))
    }

    /// Write the whole manifest, creating `.stackpatch/`.
    #[instrument(skip_all, fields(target = %target.display()))]
    pub fn write(&self, target: &Path, manifest: &StackPatchManifest) -> StackPatchResult<()> {
        let mut json = serde_json::to_string_pretty(manifest).context("manifest")?;
        json.push('\n');
        self.filesystem
            .write_file_all(&Self::manifest_path(target), &json)?;
        debug!(
            added = manifest.files.added.len(),
            modified = manifest.files.modified.len(),
            "Manifest written"
        );
        Ok(())
    }

    /// `None` when the manifest is absent or unreadable.
    pub fn read(&self, target: &Path) -> Option<StackPatchManifest> {
        let path = Self::manifest_path(target);
        if !self.filesystem.exists(&path) {
            return None;
        }

        let raw = match self.filesystem.read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Manifest could not be read");
                return None;
            }
        };

        match serde_json::from_str::<StackPatchManifest>(&raw) {
            Ok(manifest) => {
                if manifest.version > MANIFEST_VERSION {
                    warn!(
                        version = manifest.version,
                        supported = MANIFEST_VERSION,
                        "Manifest was written by a newer StackPatch"
                    );
                }
                Some(manifest)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Manifest is not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_path_flattens_directories() {
        assert_eq!(backup_path("app/layout.tsx"), ".stackpatch/backups/app_layout.tsx");
        assert_eq!(
            backup_path("src/app/layout.tsx"),
            ".stackpatch/backups/src_app_layout.tsx"
        );
    }
}
