//! Command handlers. Each turns parsed arguments into a core service call
//! and renders the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stackpatch_adapters::{LocalFilesystem, ProcessDependencyInstaller, boilerplate};
use stackpatch_core::{
    application::{InstallOutcome, InstallRequest, PatchInstaller, ports::Filesystem},
    domain::{PackageManager, PatchName},
};
use tracing::{info, instrument};

use crate::{
    cli::{AuthFlags, InstallFlags},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompts,
};

pub mod add;
pub mod completions;
pub mod config;
pub mod create;
pub mod revert;

/// `path` made absolute against the working directory.
pub(crate) fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path).with_cli_context(|| format!("Cannot resolve {}", path.display()))
}

pub(crate) fn filesystem() -> Arc<dyn Filesystem> {
    Arc::new(LocalFilesystem::new())
}

/// `--package-manager`, then `install.package_manager`.
pub(crate) fn package_manager(
    flags: &InstallFlags,
    config: &AppConfig,
) -> CliResult<Option<PackageManager>> {
    if let Some(pm) = flags.package_manager {
        return Ok(Some(pm.into()));
    }
    config
        .package_manager()
        .map_err(|e| CliError::config("install.package_manager is not a package manager", e))
}

/// `--boilerplate-dir`, then `boilerplate.dir`.
pub(crate) fn explicit_boilerplate<'a>(
    flag: Option<&'a PathBuf>,
    config: &'a AppConfig,
) -> Option<&'a Path> {
    flag.or(config.boilerplate.dir.as_ref()).map(PathBuf::as_path)
}

/// Install one patch and print the outcome.
#[instrument(skip_all, fields(patch = %patch, target = %target.display()))]
pub(crate) fn install_patch(
    patch: PatchName,
    target: &Path,
    auth: &AuthFlags,
    flags: &InstallFlags,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<InstallOutcome> {
    let boilerplate_dir = boilerplate::locate(
        explicit_boilerplate(flags.boilerplate_dir.as_ref(), config),
        patch.as_str(),
    )?;

    let request = InstallRequest {
        target: target.to_path_buf(),
        patch,
        boilerplate_dir,
        skip_dependencies: flags.skip_install || config.install.skip_dependencies,
        package_manager: package_manager(flags, config)?,
    };

    let collector = prompts::collector_for(auth, flags.yes);
    let resolver = prompts::resolver_for(flags.yes);
    let installer = PatchInstaller::new(filesystem(), Box::new(ProcessDependencyInstaller));

    output.header(&format!("Adding {patch} to {}", target.display()))?;
    let outcome = installer.install(&request, collector.as_ref(), resolver.as_ref())?;
    info!(
        added = outcome.manifest.files.added.len(),
        modified = outcome.manifest.files.modified.len(),
        "Patch installed"
    );

    report_install(&outcome, target, output)?;
    Ok(outcome)
}

fn report_install(outcome: &InstallOutcome, target: &Path, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(outcome)?;
        return Ok(());
    }

    for warning in &outcome.warnings {
        output.warning(warning)?;
    }

    let files = &outcome.manifest.files;
    output.list("Added:", &files.added)?;
    let modified: Vec<String> = files.modified.iter().map(|m| m.path.clone()).collect();
    output.list("Modified:", &modified)?;

    if let Some(guard) = &outcome.route_guard {
        output.info(&format!("Route guard written to {guard}"))?;
    }

    if outcome.dependencies_installed {
        output.success(&format!("Installed {}", outcome.packages.join(", ")))?;
    } else if let Some(command) = &outcome.manual_install_command {
        output.warning(&format!("Dependencies were not installed. Run: {command}"))?;
    }

    output.success(&format!("{} patch installed", outcome.manifest.patch_name))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print("  Fill in the values in .env.local")?;
    output.print(&format!("  Undo with: stackpatch revert {}", target.display()))?;
    Ok(())
}
