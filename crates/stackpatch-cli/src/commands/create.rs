//! `stackpatch create [name]`: bootstrap with create-next-app, then apply
//! the requested patches.

use std::str::FromStr;

use stackpatch_adapters::CreateNextAppBootstrapper;
use stackpatch_core::{
    application::ProjectCreator,
    domain::{PackageManager, PatchName},
    error::StackPatchError,
};
use tracing::{info, instrument};

use crate::{
    cli::CreateArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompts,
};

#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("")))]
pub fn execute(args: CreateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // Unknown patch names fail before anything is created.
    let patches = args
        .patches
        .iter()
        .map(|p| PatchName::from_str(p).map_err(StackPatchError::from))
        .collect::<Result<Vec<_>, _>>()?;

    let name = match args.name {
        Some(name) => name,
        None => prompts::ask_project_name()?.ok_or_else(|| CliError::InvalidInput {
            message: "a project name is required when not running in a terminal".into(),
        })?,
    };

    let package_manager =
        super::package_manager(&args.install, &config)?.unwrap_or(PackageManager::Npm);
    let parent = std::env::current_dir().with_cli_context(|| "Cannot read the working directory")?;

    output.header(&format!("Creating {name} with {package_manager}"))?;
    let creator = ProjectCreator::new(super::filesystem(), Box::new(CreateNextAppBootstrapper));
    let root = creator.create(&parent, &name, package_manager)?;
    info!(root = %root.display(), "Project bootstrapped");
    output.success(&format!("Created {}", root.display()))?;

    for patch in patches {
        super::install_patch(patch, &root, &args.auth, &args.install, &config, &output)?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {name}"))?;
    output.print(&format!("  {package_manager} run dev"))?;
    Ok(())
}
