//! Configuration collectors and conflict resolvers for the CLI.
//!
//! [`FlagCollector`] turns command-line flags into an [`AuthConfig`] without
//! asking anything. With the `interactive` feature and a terminal attached,
//! [`PromptCollector`] asks for every choice the flags left open.

use std::io::IsTerminal as _;

use stackpatch_core::{
    application::{ApplicationError, ConfigCollector, ConflictResolver},
    domain::{AuthConfig, ProjectScan, SessionMode},
    error::StackPatchResult,
};
use tracing::debug;

use crate::cli::AuthFlags;

/// Whether prompts can be shown: built with `interactive` and both stdin
/// and stdout are terminals.
pub fn is_interactive() -> bool {
    cfg!(feature = "interactive") && std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// The configuration the flags describe, defaults filling the gaps.
pub fn config_from_flags(flags: &AuthFlags) -> AuthConfig {
    let defaults = AuthConfig::default();
    AuthConfig {
        session_mode: flags.session.map(Into::into).unwrap_or(defaults.session_mode),
        database: flags.database.map(Into::into).unwrap_or(defaults.database),
        orm: flags.orm.map(Into::into).unwrap_or(defaults.orm),
        email_password: !flags.no_email_password,
        oauth_providers: flags.providers.clone(),
        add_ui: !flags.no_ui,
        protected_routes: flags.protected_routes.clone(),
    }
}

/// Yes/no question. Returns `default` when no terminal is attached.
pub fn confirm(prompt: &str, default: bool) -> bool {
    if !is_interactive() {
        return default;
    }
    ask_confirm(prompt, default)
}

#[cfg(feature = "interactive")]
fn ask_confirm(prompt: &str, default: bool) -> bool {
    dialoguer::Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .ok()
        .flatten()
        .unwrap_or(false)
}

#[cfg(not(feature = "interactive"))]
fn ask_confirm(_prompt: &str, default: bool) -> bool {
    default
}

// ── Collectors ────────────────────────────────────────────────────────────────

/// Returns the flag-derived configuration unchanged.
#[derive(Debug, Clone)]
pub struct FlagCollector {
    config: AuthConfig,
}

impl FlagCollector {
    pub fn new(flags: &AuthFlags) -> Self {
        Self {
            config: config_from_flags(flags),
        }
    }
}

impl ConfigCollector for FlagCollector {
    fn collect(&self, scan: &ProjectScan) -> StackPatchResult<Option<AuthConfig>> {
        debug!(framework = %scan.framework, "Using configuration from flags");
        Ok(Some(self.config.clone()))
    }
}

/// The collector for this run: flags only with `--yes`, when any auth flag
/// was given, or without a terminal. Otherwise prompts.
pub fn collector_for(flags: &AuthFlags, yes: bool) -> Box<dyn ConfigCollector> {
    if yes || flags.any_set() || !is_interactive() {
        return Box::new(FlagCollector::new(flags));
    }
    prompting_collector(flags)
}

#[cfg(feature = "interactive")]
fn prompting_collector(flags: &AuthFlags) -> Box<dyn ConfigCollector> {
    Box::new(PromptCollector::new(config_from_flags(flags)))
}

#[cfg(not(feature = "interactive"))]
fn prompting_collector(flags: &AuthFlags) -> Box<dyn ConfigCollector> {
    Box::new(FlagCollector::new(flags))
}

/// Decides overwrites for conflicting boilerplate files.
pub fn resolver_for(yes: bool) -> Box<dyn ConflictResolver> {
    if yes {
        return Box::new(stackpatch_adapters::StaticConflictResolver::always());
    }
    if is_interactive() {
        return Box::new(PromptConflictResolver);
    }
    Box::new(stackpatch_adapters::StaticConflictResolver::never())
}

/// Lists the conflicting files and asks once for all of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConflictResolver;

impl ConflictResolver for PromptConflictResolver {
    fn confirm_overwrite(&self, conflicts: &[String]) -> bool {
        let term = console::Term::stderr();
        let _ = term.write_line("These files already exist:");
        for path in conflicts {
            let _ = term.write_line(&format!("  {path}"));
        }
        confirm("Overwrite them? Originals are kept for revert", false)
    }
}

#[cfg(feature = "interactive")]
pub use interactive::PromptCollector;

#[cfg(not(feature = "interactive"))]
mod interactive {
    use super::*;

    pub fn project_name() -> StackPatchResult<String> {
        Err(ApplicationError::Cancelled.into())
    }
}

#[cfg(feature = "interactive")]
mod interactive {
    use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
    use stackpatch_core::domain::{DatabaseKind, OAuthProvider, OrmKind};

    use super::*;

    fn prompt_error(e: dialoguer::Error) -> ApplicationError {
        ApplicationError::ExternalCommand {
            command: "prompt".into(),
            reason: e.to_string(),
        }
    }

    pub fn project_name() -> StackPatchResult<String> {
        Ok(Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project name")
            .default("my-app".to_string())
            .interact_text()
            .map_err(prompt_error)?)
    }

    /// Asks for each choice, starting from `defaults`.
    ///
    /// Escape on any question cancels the whole configuration.
    pub struct PromptCollector {
        defaults: AuthConfig,
        theme: ColorfulTheme,
    }

    impl PromptCollector {
        pub fn new(defaults: AuthConfig) -> Self {
            Self {
                defaults,
                theme: ColorfulTheme::default(),
            }
        }

        fn select<T: Copy + PartialEq + std::fmt::Display>(
            &self,
            prompt: &str,
            options: &[T],
            current: T,
        ) -> StackPatchResult<Option<T>> {
            let default = options.iter().position(|o| *o == current).unwrap_or(0);
            let picked = Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(options)
                .default(default)
                .interact_opt()
                .map_err(prompt_error)?;
            Ok(picked.map(|i| options[i]))
        }

        fn yes_no(&self, prompt: &str, default: bool) -> StackPatchResult<Option<bool>> {
            Ok(Confirm::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default)
                .interact_opt()
                .map_err(prompt_error)?)
        }
    }

    impl ConfigCollector for PromptCollector {
        fn collect(&self, scan: &ProjectScan) -> StackPatchResult<Option<AuthConfig>> {
            debug!(framework = %scan.framework, router = %scan.router, "Prompting for configuration");
            let mut config = self.defaults.clone();

            let Some(session) = self.select(
                "Session storage",
                &[SessionMode::Database, SessionMode::Stateless],
                config.session_mode,
            )?
            else {
                return Ok(None);
            };
            config.session_mode = session;

            if session == SessionMode::Database {
                let databases = [
                    DatabaseKind::Postgres,
                    DatabaseKind::Mysql,
                    DatabaseKind::Sqlite,
                    DatabaseKind::Mongodb,
                ];
                let Some(database) = self.select("Database", &databases, config.database)? else {
                    return Ok(None);
                };
                config.database = database;

                let orms: &[OrmKind] = if database == DatabaseKind::Mongodb {
                    &[OrmKind::Prisma, OrmKind::Raw]
                } else {
                    &[OrmKind::Drizzle, OrmKind::Prisma, OrmKind::Raw]
                };
                let Some(orm) = self.select("ORM", orms, config.orm)? else {
                    return Ok(None);
                };
                config.orm = orm;
            }

            let Some(email_password) =
                self.yes_no("Enable email and password sign-in?", config.email_password)?
            else {
                return Ok(None);
            };
            config.email_password = email_password;

            let labels: Vec<&str> = OAuthProvider::ALL.iter().map(|p| p.display_name()).collect();
            let checked: Vec<bool> = OAuthProvider::ALL
                .iter()
                .map(|p| config.oauth_providers.contains(p))
                .collect();
            let Some(picked) = MultiSelect::with_theme(&self.theme)
                .with_prompt("OAuth providers (space to toggle)")
                .items(&labels)
                .defaults(&checked)
                .interact_opt()
                .map_err(prompt_error)?
            else {
                return Ok(None);
            };
            config.oauth_providers = picked.into_iter().map(|i| OAuthProvider::ALL[i]).collect();

            let Some(add_ui) = self.yes_no("Add login and signup pages?", config.add_ui)? else {
                return Ok(None);
            };
            config.add_ui = add_ui;

            let routes: String = Input::with_theme(&self.theme)
                .with_prompt("Protected routes (comma separated, e.g. /dashboard,/admin/*)")
                .default(config.protected_routes.join(","))
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            config.protected_routes = routes
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();

            Ok(Some(config))
        }
    }
}

/// Project name for `create` when none was given on the command line.
pub fn ask_project_name() -> StackPatchResult<Option<String>> {
    if !is_interactive() {
        return Ok(None);
    }
    interactive::project_name().map(Some)
}
