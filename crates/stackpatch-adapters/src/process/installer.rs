//! Package installation through the project's package manager.

use std::path::Path;

use stackpatch_core::{
    application::ports::DependencyInstaller, domain::PackageManager, error::StackPatchResult,
};
use tracing::{info, instrument};

use super::run_inherited;

/// Runs `npm install` / `pnpm add` / `yarn add` / `bun add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDependencyInstaller;

impl DependencyInstaller for ProcessDependencyInstaller {
    #[instrument(skip_all, fields(package_manager = %package_manager, count = packages.len()))]
    fn install(
        &self,
        target: &Path,
        packages: &[String],
        package_manager: PackageManager,
    ) -> StackPatchResult<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let (program, args) = package_manager.install_command(packages);
        run_inherited(program, &args, target)?;
        info!(?packages, "Dependencies installed");
        Ok(())
    }
}
