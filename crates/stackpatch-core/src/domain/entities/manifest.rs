//! The persisted record of one patch installation.

use serde::{Deserialize, Serialize};

/// Current manifest schema version. Readers branch on `version` when the
/// shape changes.
pub const MANIFEST_VERSION: u32 = 1;

/// Everything revert needs to undo an installation.
///
/// Stored as camelCase JSON at `.stackpatch/manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPatchManifest {
    pub version: u32,
    pub patch_name: String,
    /// Absolute path of the project at install time.
    pub target: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub oauth_providers: Vec<String>,
    #[serde(default)]
    pub files: ManifestFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFiles {
    /// Files the installer created. Never contains a path that existed
    /// before installation.
    #[serde(default)]
    pub added: Vec<String>,
    /// Files edited in place, with their exact pre-installation text.
    #[serde(default)]
    pub modified: Vec<ModifiedFile>,
    /// Backup copies under `.stackpatch/backups/`.
    #[serde(default)]
    pub backed_up: Vec<String>,
    /// Absent in manifests written before env tracking existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_files: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedFile {
    pub path: String,
    pub original_content: String,
}

impl StackPatchManifest {
    pub fn new(patch_name: impl Into<String>, target: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            patch_name: patch_name.into(),
            target: target.into(),
            timestamp: timestamp.into(),
            dependencies: Vec::new(),
            oauth_providers: Vec::new(),
            files: ManifestFiles::default(),
        }
    }
}

impl ManifestFiles {
    /// Record a created file. Ignored if the path is already tracked as
    /// modified, since that file existed before installation.
    pub fn record_added(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.is_modified(&path) || self.added.contains(&path) {
            return;
        }
        self.added.push(path);
    }

    /// Record a file edited in place. The first original recorded for a path
    /// wins, so re-installations keep the true pre-installation text.
    pub fn record_modified(&mut self, path: impl Into<String>, original_content: impl Into<String>) {
        let path = path.into();
        if self.is_modified(&path) {
            return;
        }
        self.added.retain(|p| p != &path);
        self.modified.push(ModifiedFile {
            path,
            original_content: original_content.into(),
        });
    }

    pub fn record_backup(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.backed_up.contains(&path) {
            self.backed_up.push(path);
        }
    }

    pub fn record_env_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        let env_files = self.env_files.get_or_insert_with(Vec::new);
        if !env_files.contains(&path) {
            env_files.push(path);
        }
    }

    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.iter().any(|m| m.path == path)
    }

    /// Fold an earlier installation's record into this one.
    ///
    /// Earlier originals take precedence over anything captured now, because
    /// the "original" seen by a second install is the first install's output.
    pub fn carry_forward(&mut self, previous: &ManifestFiles) {
        let mut modified = previous.modified.clone();
        for entry in self.modified.drain(..) {
            if !modified.iter().any(|m| m.path == entry.path) {
                modified.push(entry);
            }
        }
        self.modified = modified;

        let mut added: Vec<String> = previous
            .added
            .iter()
            .filter(|p| !self.modified.iter().any(|m| &m.path == *p))
            .cloned()
            .collect();
        for path in self.added.drain(..) {
            if !added.contains(&path) && !self.modified.iter().any(|m| m.path == path) {
                added.push(path);
            }
        }
        self.added = added;

        for backup in &previous.backed_up {
            if !self.backed_up.contains(backup) {
                self.backed_up.push(backup.clone());
            }
        }

        if let Some(previous_env) = &previous.env_files {
            for path in previous_env {
                self.record_env_file(path.clone());
            }
        }
    }
}
