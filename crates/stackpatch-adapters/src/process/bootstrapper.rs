//! New projects via `create-next-app`.

use std::path::{Path, PathBuf};

use stackpatch_core::{
    application::ports::ProjectBootstrapper, domain::PackageManager, error::StackPatchResult,
};
use tracing::instrument;

use super::run_inherited;

/// `npx create-next-app@latest` with the App Router, TypeScript, Tailwind
/// and the `@/*` alias, so the auth patch applies without remapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateNextAppBootstrapper;

impl CreateNextAppBootstrapper {
    pub fn args(name: &str, package_manager: PackageManager) -> Vec<String> {
        let use_package_manager = format!("--use-{package_manager}");
        [
            "create-next-app@latest",
            name,
            "--ts",
            "--app",
            "--eslint",
            "--tailwind",
            "--no-src-dir",
            "--import-alias",
            "@/*",
            &use_package_manager,
            "--yes",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl ProjectBootstrapper for CreateNextAppBootstrapper {
    #[instrument(skip_all, fields(name = %name))]
    fn bootstrap(
        &self,
        parent: &Path,
        name: &str,
        package_manager: PackageManager,
    ) -> StackPatchResult<PathBuf> {
        run_inherited("npx", &Self::args(name, package_manager), parent)?;
        Ok(parent.join(name))
    }
}
