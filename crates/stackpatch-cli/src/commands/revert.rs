//! `stackpatch revert [target]`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stackpatch_adapters::boilerplate;
use stackpatch_core::application::{ManifestStore, RevertEngine, RevertReport};
use tracing::{instrument, warn};

use crate::{
    cli::RevertArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompts,
};

#[instrument(skip_all, fields(target = %args.target.display()))]
pub fn execute(args: RevertArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let target = super::absolute(&args.target)?;
    let fs = super::filesystem();

    let Some(manifest) = ManifestStore::new(Arc::clone(&fs)).read(&target) else {
        output.info(&format!("Nothing to revert in {}", target.display()))?;
        output.json(&serde_json::json!({ "reverted": false }))?;
        return Ok(());
    };

    if !args.yes
        && !prompts::confirm(
            &format!("Revert the {} patch in {}?", manifest.patch_name, target.display()),
            true,
        )
    {
        return Err(CliError::Cancelled);
    }

    let explicit = super::explicit_boilerplate(args.boilerplate_dir.as_ref(), &config);
    let boilerplate_dir = boilerplate_dir(explicit, &manifest.patch_name);

    output.header(&format!("Reverting {} in {}", manifest.patch_name, target.display()))?;
    let Some(report) = RevertEngine::new(fs).revert(&target, &boilerplate_dir) else {
        output.info("Nothing to revert")?;
        return Ok(());
    };

    report_revert(&report, &output)?;

    if report.is_complete() {
        output.success("Revert complete")?;
        Ok(())
    } else {
        Err(CliError::RevertIncomplete {
            path: target,
            failures: report.failed_removals.len()
                + report.failed_restorations.len()
                + usize::from(!report.manifest_removed),
        })
    }
}

/// Where the patch's boilerplate lives. Revert still runs without it, so a
/// failed lookup falls back to a path the engine will report as missing.
fn boilerplate_dir(explicit: Option<&Path>, patch: &str) -> PathBuf {
    boilerplate::locate(explicit, patch).unwrap_or_else(|e| {
        warn!(error = %e, "Boilerplate not found; only generated files can be matched");
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("boilerplate"))
    })
}

fn report_revert(report: &RevertReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(report)?;
        return Ok(());
    }

    output.list("Removed:", &report.removed)?;
    output.list("Restored:", &report.restored)?;
    output.list("Env files removed:", &report.env_removed)?;
    output.list("Dependencies removed from package.json:", &report.dependencies_removed)?;

    if !report.skipped.is_empty() {
        output.warning(&format!(
            "Kept {} file(s) that are not part of the patch",
            report.skipped.len()
        ))?;
        output.list("Kept:", &report.skipped)?;
    }
    for path in &report.failed_removals {
        output.failure(&format!("Could not remove {path}"))?;
    }
    for path in &report.failed_restorations {
        output.failure(&format!("Could not restore {path}"))?;
    }
    for warning in &report.warnings {
        output.warning(warning)?;
    }
    if !report.dependencies_removed.is_empty() {
        output.info("Run your package manager's install to update the lock file")?;
    }
    Ok(())
}
