//! Read-only facts about a target project.

use serde::Serialize;

use crate::domain::value_objects::{
    ExistingAuth, FrameworkKind, PackageManager, RouterKind, Runtime,
};

/// What the scanner learned about a project.
///
/// Recomputed on every run and never persisted. Every field has a safe
/// default so a directory without `package.json` still scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectScan {
    pub framework: FrameworkKind,
    pub router: RouterKind,
    pub typescript: bool,
    pub package_manager: PackageManager,
    pub runtime: Runtime,
    pub has_src_dir: bool,
    pub existing_auth: ExistingAuth,
    /// Raw `next` dependency range from `package.json`, e.g. `^15.1.0`.
    pub next_version: Option<String>,
    /// Major version parsed from [`Self::next_version`].
    pub next_major: Option<u64>,
}

impl ProjectScan {
    pub fn is_next(&self) -> bool {
        self.framework == FrameworkKind::Next
    }
}
