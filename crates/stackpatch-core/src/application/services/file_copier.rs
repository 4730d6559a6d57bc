//! Conflict-aware copy of a patch's boilerplate tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::{Captures, Regex};
use tracing::{debug, info, instrument, warn};

use super::to_slash;
use crate::application::{
    ApplicationError,
    ports::{ConflictResolver, Filesystem},
};
use crate::domain::{ModifiedFile, ProjectLayout};
use crate::error::{StackPatchError, StackPatchResult};

/// `"@/components/x"` and `"@/lib/x"` specifiers in boilerplate sources.
const BOILERPLATE_IMPORT: &str = r#"(["'])@/(components|lib)/([^"']+)(["'])"#;

/// One boilerplate file and where it lands in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
    pub source: PathBuf,
    /// Project-relative, `/`-separated.
    pub dest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Files that did not exist before the copy.
    pub added: Vec<String>,
    /// Files that existed and were replaced, with their previous text.
    pub overwritten: Vec<ModifiedFile>,
}

/// Map a boilerplate-relative path onto the project layout.
///
/// Top-level `app`, `components` and `lib` go to the resolved directories;
/// anything else keeps its path.
pub fn remap(relative: &str, layout: &ProjectLayout) -> String {
    let (head, rest) = relative.split_once('/').unwrap_or((relative, ""));
    let dir = match head {
        "app" => layout.app_dir.as_str(),
        "components" => layout.components_dir.as_str(),
        "lib" => layout.lib_dir.as_str(),
        _ => return relative.to_string(),
    };
    if rest.is_empty() {
        dir.to_string()
    } else {
        format!("{dir}/{rest}")
    }
}

/// Every file of `source_root` with its remapped destination.
///
/// Revert calls this too, so membership is decided by the same mapping the
/// copy used.
pub fn plan_entries(
    filesystem: &dyn Filesystem,
    source_root: &Path,
    layout: &ProjectLayout,
) -> StackPatchResult<Vec<CopyEntry>> {
    if !filesystem.is_dir(source_root) {
        return Err(ApplicationError::BoilerplateMissing {
            path: source_root.to_path_buf(),
        }
        .into());
    }

    Ok(filesystem
        .walk_files(source_root)?
        .into_iter()
        .map(|relative| CopyEntry {
            dest: remap(&to_slash(&relative), layout),
            source: source_root.join(relative),
        })
        .collect())
}

pub struct FileCopier {
    filesystem: Arc<dyn Filesystem>,
}

impl FileCopier {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Copy `source_root` into `target`.
    ///
    /// Files in `previously_added` came from an earlier installation and are
    /// replaced without asking. Every other existing destination is a
    /// conflict; if `resolver` declines, nothing is written.
    #[instrument(skip_all, fields(source = %source_root.display(), target = %target.display()))]
    pub fn copy(
        &self,
        source_root: &Path,
        target: &Path,
        layout: &ProjectLayout,
        resolver: &dyn ConflictResolver,
        previously_added: &[String],
    ) -> StackPatchResult<CopyOutcome> {
        let entries = plan_entries(self.filesystem.as_ref(), source_root, layout)?;

        let conflicts: Vec<String> = entries
            .iter()
            .filter(|e| self.filesystem.exists(&target.join(&e.dest)))
            .filter(|e| !previously_added.contains(&e.dest))
            .map(|e| e.dest.clone())
            .collect();

        if !conflicts.is_empty() {
            info!(count = conflicts.len(), "Existing files would be overwritten");
            if !resolver.confirm_overwrite(&conflicts) {
                return Err(ApplicationError::ConflictDeclined { conflicts }.into());
            }
        }

        let mut outcome = CopyOutcome::default();
        for path in &conflicts {
            outcome.overwritten.push(ModifiedFile {
                path: path.clone(),
                original_content: self.filesystem.read_to_string(&target.join(path))?,
            });
        }
        outcome.added = entries
            .iter()
            .filter(|e| !conflicts.contains(&e.dest))
            .map(|e| e.dest.clone())
            .collect();

        for entry in &entries {
            let dest = target.join(&entry.dest);
            if let Some(parent) = dest.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.copy_file(&entry.source, &dest)?;
            debug!(file = %entry.dest, "Copied");
        }

        self.rewrite_imports(target, layout, &entries);

        info!(
            added = outcome.added.len(),
            overwritten = outcome.overwritten.len(),
            "Boilerplate copied"
        );
        Ok(outcome)
    }

    /// Point `@/components/...` and `@/lib/...` imports at the project's
    /// real directories. Failures are logged and the file left as copied.
    fn rewrite_imports(&self, target: &Path, layout: &ProjectLayout, entries: &[CopyEntry]) {
        let pattern = match Regex::new(BOILERPLATE_IMPORT) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(error = %e, "Import pattern failed to compile; imports left as-is");
                return;
            }
        };

        for entry in entries
            .iter()
            .filter(|e| e.dest.ends_with(".ts") || e.dest.ends_with(".tsx"))
        {
            if let Err(e) = self.rewrite_file(target, layout, &entry.dest, &pattern) {
                warn!(file = %entry.dest, error = %e, "Import rewrite skipped");
            }
        }
    }

    fn rewrite_file(
        &self,
        target: &Path,
        layout: &ProjectLayout,
        file: &str,
        pattern: &Regex,
    ) -> Result<(), StackPatchError> {
        let path = target.join(file);
        let source = self.filesystem.read_to_string(&path)?;
        let rewritten = rewrite_specifiers(&source, layout, file, pattern);
        if rewritten != source {
            self.filesystem.write_file(&path, &rewritten)?;
            debug!(file, "Imports rewritten");
        }
        Ok(())
    }
}

fn rewrite_specifiers(source: &str, layout: &ProjectLayout, file: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(source, |caps: &Captures| {
            let module = &caps[3];
            let specifier = match &caps[2] {
                "components" => layout.component_import_path(module, file),
                _ => layout.lib_import_path(module, file),
            };
            format!("{}{specifier}{}", &caps[1], &caps[4])
        })
        .into_owned()
}
