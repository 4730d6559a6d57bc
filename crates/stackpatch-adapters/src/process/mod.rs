//! Adapters that run external programs.

mod bootstrapper;
mod installer;

pub use bootstrapper::CreateNextAppBootstrapper;
pub use installer::ProcessDependencyInstaller;

use std::process::{Command, Stdio};

use stackpatch_core::{application::ApplicationError, error::StackPatchResult};
use tracing::debug;

/// Run `program args..` in `dir`, inheriting the terminal so the tool's
/// own progress output stays visible.
pub(crate) fn run_inherited(
    program: &str,
    args: &[String],
    dir: &std::path::Path,
) -> StackPatchResult<()> {
    let command_line = format!("{program} {}", args.join(" "));
    debug!(command = %command_line, dir = %dir.display(), "Running");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .status()
        .map_err(|e| ApplicationError::ExternalCommand {
            command: command_line.clone(),
            reason: e.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ApplicationError::ExternalCommand {
            command: command_line,
            reason: match status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".into(),
            },
        }
        .into())
    }
}
