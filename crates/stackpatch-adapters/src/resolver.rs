//! Non-interactive conflict resolution.

use stackpatch_core::application::ports::ConflictResolver;
use tracing::info;

/// Answers every overwrite question the same way (`--yes`, CI, tests).
#[derive(Debug, Clone, Copy)]
pub struct StaticConflictResolver {
    overwrite: bool,
}

impl StaticConflictResolver {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    pub fn always() -> Self {
        Self::new(true)
    }

    pub fn never() -> Self {
        Self::new(false)
    }
}

impl ConflictResolver for StaticConflictResolver {
    fn confirm_overwrite(&self, conflicts: &[String]) -> bool {
        info!(count = conflicts.len(), overwrite = self.overwrite, "Resolving conflicts");
        self.overwrite
    }
}
