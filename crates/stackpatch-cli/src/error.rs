//! CLI errors: messages, suggestions and exit codes.
//!
//! Core failures arrive as [`StackPatchError`] and keep their own
//! suggestions; everything the CLI itself can get wrong is a variant here.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use stackpatch_core::error::StackPatchError;

pub use stackpatch_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that parse but make no sense together.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Core(#[from] StackPatchError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// Revert ran to the end but left something behind.
    #[error("Revert of {path} was incomplete: {failures} step(s) failed")]
    RevertIncomplete { path: PathBuf, failures: usize },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn config(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file ({} or ./stackpatch.toml)",
                    crate::config::AppConfig::config_path().display()
                ),
                "Run 'stackpatch config show' to see the effective values".into(),
                "STACKPATCH__* environment variables override the file".into(),
            ],

            Self::Core(core) => core.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::RevertIncomplete { path, .. } => vec![
                "The failed paths are listed above".into(),
                format!(
                    "Original contents are kept in {}",
                    path.join(".stackpatch/backups").display()
                ),
                "Fix the listed files by hand, then run 'stackpatch revert' again".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Compatibility => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::RevertIncomplete { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Declined prompts and cancellations are not failures of the tool.
    fn is_graceful(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Core(core) => core.is_declined(),
            _ => false,
        }
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        if self.is_graceful() {
            output.push_str(&format!("\n{} {}\n", "!".yellow().bold(), self.to_string().yellow()));
        } else {
            output.push_str(&format!("\n{} {}\n\n", "✗".red().bold(), "Error:".red().bold()));
            output.push_str(&format!("  {}\n", self.to_string().red()));
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!("\n  {} {}\n", "→".dimmed(), err.to_string().dimmed()));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose && !self.is_graceful() {
            output.push_str(&format!(
                "\n{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// [`Self::format_colored`] without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        if self.is_graceful() {
            out.push_str(&format!("\n{self}\n"));
        } else {
            out.push_str(&format!("\nError: {self}\n"));
        }

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose && !self.is_graceful() {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Attach a message while converting I/O failures into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackpatch_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    fn core(err: impl Into<StackPatchError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn unknown_patch_is_a_user_error() {
        let err = core(DomainError::UnknownPatch {
            name: "payments".into(),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("payments"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn missing_boilerplate_is_not_found() {
        let err = core(ApplicationError::BoilerplateMissing {
            path: PathBuf::from("/opt/boilerplate/auth"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_package_json_is_configuration() {
        let err = core(ApplicationError::NotAProject {
            path: PathBuf::from("/tmp/empty"),
        });
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn declined_conflict_is_graceful() {
        let err = core(ApplicationError::ConflictDeclined {
            conflicts: vec!["app/auth/login/page.tsx".into()],
        });
        assert_eq!(err.exit_code(), 2);
        let text = err.format_plain(false);
        assert!(!text.contains("Error:"));
        assert!(!text.contains("--verbose"));
    }

    #[test]
    fn internal_errors_map_to_one() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(err.exit_code(), 1);
        let incomplete = CliError::RevertIncomplete {
            path: PathBuf::from("/p"),
            failures: 2,
        };
        assert_eq!(incomplete.exit_code(), 1);
        assert!(incomplete.suggestions().iter().any(|s| s.contains("backups")));
    }

    #[test]
    fn format_plain_lists_suggestions() {
        let err = CliError::InvalidInput {
            message: "no project name".into(),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn verbose_shows_causes() {
        let err = CliError::config("bad file", anyhow::anyhow!("expected a table"));
        assert_eq!(err.exit_code(), 4);
        assert!(err.format_plain(true).contains("Caused by: expected a table"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading target");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
