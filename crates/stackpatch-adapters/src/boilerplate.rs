//! Locating the boilerplate trees shipped with StackPatch.

use std::env;
use std::path::{Path, PathBuf};

use stackpatch_core::{application::ApplicationError, error::StackPatchResult};
use tracing::debug;

/// Environment variable that overrides every other location.
pub const BOILERPLATE_ENV: &str = "STACKPATCH_BOILERPLATE_DIR";

/// Candidate boilerplate roots, highest priority first.
///
/// `explicit` comes from `--boilerplate-dir` or the config file.
pub fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(dir) = env::var_os(BOILERPLATE_ENV).filter(|v| !v.is_empty()) {
        out.push(PathBuf::from(dir));
    }
    if let Some(dir) = explicit {
        out.push(dir.to_path_buf());
    }
    if let Ok(cwd) = env::current_dir() {
        out.push(cwd.join("boilerplate"));
    }
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        out.push(exe_dir.join("boilerplate"));
        out.push(exe_dir.join("../share/stackpatch/boilerplate"));
    }
    out
}

/// First candidate that contains a `patch` subdirectory.
pub fn locate(explicit: Option<&Path>, patch: &str) -> StackPatchResult<PathBuf> {
    let candidates = candidates(explicit);
    for dir in &candidates {
        if dir.join(patch).is_dir() {
            debug!(dir = %dir.display(), "Boilerplate found");
            return Ok(dir.clone());
        }
    }

    let expected = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("boilerplate"))
        .join(patch);
    Err(ApplicationError::BoilerplateMissing { path: expected }.into())
}
