//! Undo a patch installation from its manifest.
//!
//! Revert is best-effort: each phase runs even if an earlier one failed, and
//! every failure lands in the [`RevertReport`] instead of aborting.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{
    dependencies::remove_dependencies,
    file_copier::plan_entries,
    generator::generator_owned_paths,
    manifest_store::{ManifestStore, STATE_DIR, backup_path},
    path_resolver::PathResolver,
};
use crate::application::ports::Filesystem;
use crate::domain::{
    StackPatchManifest,
    codegen::{env::CONVENTIONAL_ENV_FILES, is_generated},
};

/// What a revert did, and what it could not do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertReport {
    pub removed: Vec<String>,
    /// Listed as added but not provably ours; left in place.
    pub skipped: Vec<String>,
    pub failed_removals: Vec<String>,
    pub env_removed: Vec<String>,
    pub restored: Vec<String>,
    pub failed_restorations: Vec<String>,
    pub dependencies_removed: Vec<String>,
    pub pruned_dirs: Vec<String>,
    pub warnings: Vec<String>,
    pub manifest_removed: bool,
}

impl RevertReport {
    pub fn is_complete(&self) -> bool {
        self.failed_removals.is_empty() && self.failed_restorations.is_empty() && self.manifest_removed
    }
}

/// Why a path counts as StackPatch-authored.
enum Membership {
    /// Copied from this boilerplate file.
    Boilerplate(PathBuf),
    /// A generator output; must still carry the marker.
    Generated,
}

pub struct RevertEngine {
    filesystem: Arc<dyn Filesystem>,
}

impl RevertEngine {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Revert the installation recorded in `target`'s manifest.
    ///
    /// `boilerplate_dir` holds one subdirectory per patch. Returns `None`
    /// when there is no readable manifest.
    #[instrument(skip_all, fields(target = %target.display()))]
    pub fn revert(&self, target: &Path, boilerplate_dir: &Path) -> Option<RevertReport> {
        let store = ManifestStore::new(Arc::clone(&self.filesystem));
        let manifest = store.read(target)?;
        info!(patch = %manifest.patch_name, installed = %manifest.timestamp, "Reverting");

        let mut report = RevertReport::default();
        let members = self.membership(target, &boilerplate_dir.join(&manifest.patch_name), &mut report);

        let mut prune: BTreeSet<String> = BTreeSet::new();
        self.remove_added(target, &manifest, &members, &mut prune, &mut report);
        self.remove_env_files(target, &manifest, &mut report);
        self.restore_modified(target, &manifest, &mut report);
        self.remove_dependencies(target, &manifest, &mut report);
        self.prune_dirs(target, &prune, &mut report);

        let state = target.join(STATE_DIR);
        if self.filesystem.exists(&state) {
            if let Err(e) = self.filesystem.remove_dir_all(&state) {
                report.warnings.push(format!("Could not remove {STATE_DIR}/: {e}"));
            }
        }

        report.manifest_removed = !store.exists(target);
        if !report.manifest_removed {
            report
                .warnings
                .push("The manifest is still present after revert".into());
        }

        info!(
            removed = report.removed.len(),
            restored = report.restored.len(),
            complete = report.is_complete(),
            "Revert finished"
        );
        Some(report)
    }

    /// Paths StackPatch may have authored for the current project layout.
    fn membership(
        &self,
        target: &Path,
        patch_dir: &Path,
        report: &mut RevertReport,
    ) -> BTreeMap<String, Membership> {
        let layout = PathResolver::new(Arc::clone(&self.filesystem)).resolve_layout(target);
        let mut members = BTreeMap::new();

        for path in generator_owned_paths(&layout) {
            members.insert(path, Membership::Generated);
        }

        match plan_entries(self.filesystem.as_ref(), patch_dir, &layout) {
            Ok(entries) => {
                for entry in entries {
                    members.insert(entry.dest, Membership::Boilerplate(entry.source));
                }
            }
            Err(e) => {
                warn!(error = %e, "Boilerplate unavailable; only generated files can be verified");
                report.warnings.push(format!(
                    "Boilerplate not found at {}; copied files were left in place",
                    patch_dir.display()
                ));
            }
        }
        members
    }

    fn remove_added(
        &self,
        target: &Path,
        manifest: &StackPatchManifest,
        members: &BTreeMap<String, Membership>,
        prune: &mut BTreeSet<String>,
        report: &mut RevertReport,
    ) {
        for path in &manifest.files.added {
            let full = target.join(path);
            if !self.filesystem.exists(&full) {
                debug!(file = %path, "Already gone");
                continue;
            }

            let ours = match members.get(path) {
                Some(Membership::Boilerplate(source)) => self.filesystem.exists(source),
                Some(Membership::Generated) => self
                    .filesystem
                    .read_to_string(&full)
                    .map(|content| is_generated(&content))
                    .unwrap_or(false),
                None => false,
            };
            if !ours {
                warn!(file = %path, "Not a StackPatch file; leaving it");
                report.skipped.push(path.clone());
                continue;
            }

            match self.filesystem.remove_file(&full) {
                Ok(()) => {
                    report.removed.push(path.clone());
                    prune.extend(ancestors(path));
                }
                Err(e) => {
                    warn!(file = %path, error = %e, "Removal failed");
                    report.failed_removals.push(path.clone());
                }
            }
        }
    }

    fn remove_env_files(&self, target: &Path, manifest: &StackPatchManifest, report: &mut RevertReport) {
        let candidates: Vec<String> = match &manifest.files.env_files {
            Some(tracked) => tracked.clone(),
            None => CONVENTIONAL_ENV_FILES.iter().map(|f| f.to_string()).collect(),
        };

        for file in candidates {
            let full = target.join(&file);
            let generated = self
                .filesystem
                .read_to_string(&full)
                .map(|content| is_generated(&content))
                .unwrap_or(false);
            if !generated {
                continue;
            }
            match self.filesystem.remove_file(&full) {
                Ok(()) => report.env_removed.push(file),
                Err(e) => {
                    warn!(file = %file, error = %e, "Env file removal failed");
                    report.failed_removals.push(file);
                }
            }
        }
    }

    fn restore_modified(&self, target: &Path, manifest: &StackPatchManifest, report: &mut RevertReport) {
        for entry in &manifest.files.modified {
            let full = target.join(&entry.path);
            match self.filesystem.write_file_all(&full, &entry.original_content) {
                Ok(()) => {
                    report.restored.push(entry.path.clone());
                    continue;
                }
                Err(e) => warn!(file = %entry.path, error = %e, "Restore from manifest failed"),
            }

            let backup = target.join(backup_path(&entry.path));
            let from_backup = self.filesystem.exists(&backup)
                && self.filesystem.copy_file(&backup, &full).is_ok();
            if from_backup {
                report.restored.push(entry.path.clone());
            } else {
                report.failed_restorations.push(entry.path.clone());
            }
        }
    }

    fn remove_dependencies(&self, target: &Path, manifest: &StackPatchManifest, report: &mut RevertReport) {
        if manifest.dependencies.is_empty() {
            return;
        }
        match remove_dependencies(self.filesystem.as_ref(), target, &manifest.dependencies) {
            Ok(removed) => report.dependencies_removed = removed,
            Err(e) => report
                .warnings
                .push(format!("Could not update package.json: {e}")),
        }
    }

    /// Remove empty candidate directories, deepest first. Only ancestors of
    /// removed files are candidates; other directories are never touched.
    fn prune_dirs(&self, target: &Path, candidates: &BTreeSet<String>, report: &mut RevertReport) {
        let mut ordered: Vec<&String> = candidates.iter().collect();
        ordered.sort_by_key(|dir| std::cmp::Reverse(dir.matches('/').count()));

        for dir in ordered {
            let full = target.join(dir);
            if !self.filesystem.is_dir(&full) {
                continue;
            }
            let empty = self
                .filesystem
                .read_dir(&full)
                .map(|children| children.is_empty())
                .unwrap_or(false);
            if empty && self.filesystem.remove_dir(&full).is_ok() {
                report.pruned_dirs.push(dir.clone());
            } else {
                debug!(dir = %dir, "Not empty; kept");
            }
        }
    }
}

/// Proper ancestors of a relative path, excluding the project root.
fn ancestors(path: &str) -> Vec<String> {
    let parts: Vec<&str> = path.split('/').collect();
    (1..parts.len()).map(|n| parts[..n].join("/")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_exclude_root_and_file() {
        assert_eq!(
            ancestors("app/auth/login/page.tsx"),
            vec!["app", "app/auth", "app/auth/login"]
        );
        assert!(ancestors(".env.example").is_empty());
    }

    #[test]
    fn completeness_requires_manifest_gone() {
        let mut report = RevertReport::default();
        assert!(!report.is_complete());
        report.manifest_removed = true;
        assert!(report.is_complete());
        report.failed_restorations.push("app/layout.tsx".into());
        assert!(!report.is_complete());
    }
}
