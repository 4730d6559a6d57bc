//! `stackpatch add <patch> [target]`.

use std::str::FromStr;

use stackpatch_core::{domain::PatchName, error::StackPatchError};
use tracing::instrument;

use crate::{
    cli::AddArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(patch = %args.patch))]
pub fn execute(args: AddArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let patch = PatchName::from_str(&args.patch).map_err(StackPatchError::from)?;
    let target = super::absolute(&args.target)?;

    super::install_patch(patch, &target, &args.auth, &args.install, &config, &output)?;
    Ok(())
}
