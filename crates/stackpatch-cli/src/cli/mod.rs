//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here. The command modules
//! convert these into core types; no business logic lives here.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stackpatch_core::domain::{DatabaseKind, OAuthProvider, OrmKind, PackageManager, SessionMode};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "stackpatch",
    bin_name = "stackpatch",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Add reversible feature patches to Next.js projects",
    long_about = "StackPatch injects pre-built features (currently `auth`) into \
                  Next.js projects and records every change in \
                  .stackpatch/manifest.json so the patch can be reverted.",
    after_help = "EXAMPLES:\n\
        \x20 stackpatch add auth\n\
        \x20 stackpatch add auth ./my-app --session stateless --provider github --protect /dashboard\n\
        \x20 stackpatch create my-app --patch auth\n\
        \x20 stackpatch revert ./my-app",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a patch into an existing project.
    #[command(
        about = "Add a patch to a project",
        after_help = "EXAMPLES:\n\
            \x20 stackpatch add auth\n\
            \x20 stackpatch add auth ../shop --yes --skip-install\n\
            \x20 stackpatch add auth --session database --database sqlite --orm prisma"
    )]
    Add(AddArgs),

    /// Bootstrap a new Next.js project, then apply patches to it.
    #[command(
        about = "Create a new Next.js project",
        after_help = "EXAMPLES:\n\
            \x20 stackpatch create my-app\n\
            \x20 stackpatch create my-app --patch auth --package-manager pnpm"
    )]
    Create(CreateArgs),

    /// Undo an installation using its manifest.
    #[command(
        about = "Revert an installed patch",
        after_help = "EXAMPLES:\n\
            \x20 stackpatch revert\n\
            \x20 stackpatch revert ./my-app --yes"
    )]
    Revert(RevertArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackpatch completions bash > ~/.local/share/bash-completion/completions/stackpatch\n\
            \x20 stackpatch completions zsh  > ~/.zfunc/_stackpatch"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stackpatch config show\n\
            \x20 stackpatch config get install.package_manager\n\
            \x20 stackpatch config path"
    )]
    Config(ConfigCommands),
}

// ── add ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Patch to install. Only `auth` exists today.
    #[arg(value_name = "PATCH", help = "Patch to install (auth)")]
    pub patch: String,

    #[arg(
        value_name = "TARGET",
        default_value = ".",
        help = "Project directory (default: current directory)"
    )]
    pub target: PathBuf,

    #[command(flatten)]
    pub auth: AuthFlags,

    #[command(flatten)]
    pub install: InstallFlags,
}

// ── create ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Directory name for the new project. Prompted for when omitted.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    #[arg(
        long = "patch",
        value_name = "PATCH",
        value_delimiter = ',',
        help = "Patches to apply after creation"
    )]
    pub patches: Vec<String>,

    #[command(flatten)]
    pub auth: AuthFlags,

    #[command(flatten)]
    pub install: InstallFlags,
}

// ── revert ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RevertArgs {
    #[arg(
        value_name = "TARGET",
        default_value = ".",
        help = "Project directory (default: current directory)"
    )]
    pub target: PathBuf,

    #[arg(short = 'y', long = "yes", help = "Revert without asking")]
    pub yes: bool,

    #[arg(
        long = "boilerplate-dir",
        value_name = "DIR",
        help = "Directory holding the patch boilerplate trees"
    )]
    pub boilerplate_dir: Option<PathBuf>,
}

// ── shared flag groups ────────────────────────────────────────────────────────

/// Preset answers for the auth configuration.
///
/// Flags left unset fall back to the defaults, or are asked for when running
/// interactively.
#[derive(Debug, Clone, Default, Args)]
pub struct AuthFlags {
    #[arg(long = "session", value_enum, value_name = "MODE", help = "Session storage")]
    pub session: Option<SessionArg>,

    #[arg(long = "database", value_enum, value_name = "DB", help = "Database for sessions")]
    pub database: Option<DatabaseArg>,

    #[arg(long = "orm", value_enum, value_name = "ORM", help = "ORM used by the adapter")]
    pub orm: Option<OrmArg>,

    #[arg(long = "no-email-password", help = "Disable email and password sign-in")]
    pub no_email_password: bool,

    #[arg(
        long = "provider",
        value_name = "NAME",
        value_delimiter = ',',
        value_parser = parse_provider,
        help = "OAuth provider (repeatable, e.g. github,google)"
    )]
    pub providers: Vec<OAuthProvider>,

    #[arg(long = "no-ui", help = "Skip the login/signup pages and layout edits")]
    pub no_ui: bool,

    #[arg(
        long = "protect",
        value_name = "ROUTE",
        value_delimiter = ',',
        help = "Protected route, `/path` or `/path/*` (repeatable)"
    )]
    pub protected_routes: Vec<String>,
}

impl AuthFlags {
    /// True when any auth choice came from the command line.
    pub fn any_set(&self) -> bool {
        self.session.is_some()
            || self.database.is_some()
            || self.orm.is_some()
            || self.no_email_password
            || !self.providers.is_empty()
            || self.no_ui
            || !self.protected_routes.is_empty()
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct InstallFlags {
    #[arg(
        short = 'y',
        long = "yes",
        help = "Accept defaults and overwrite conflicting files without asking"
    )]
    pub yes: bool,

    #[arg(long = "skip-install", help = "Do not run the package manager")]
    pub skip_install: bool,

    #[arg(
        long = "package-manager",
        value_enum,
        value_name = "PM",
        help = "Package manager (default: detected from lock files)"
    )]
    pub package_manager: Option<PackageManagerArg>,

    #[arg(
        long = "boilerplate-dir",
        value_name = "DIR",
        help = "Directory holding the patch boilerplate trees"
    )]
    pub boilerplate_dir: Option<PathBuf>,
}

fn parse_provider(value: &str) -> Result<OAuthProvider, String> {
    OAuthProvider::from_str(value).map_err(|_| {
        let known: Vec<&str> = OAuthProvider::ALL.iter().map(|p| p.as_str()).collect();
        format!("unknown provider '{value}' (expected one of: {})", known.join(", "))
    })
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML.
    Show,
    /// Print one value.
    Get {
        /// Dotted key path, e.g. `install.package_manager`.
        key: String,
    },
    /// Print the path of the user configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionArg {
    Database,
    Stateless,
}

impl From<SessionArg> for SessionMode {
    fn from(arg: SessionArg) -> Self {
        match arg {
            SessionArg::Database => Self::Database,
            SessionArg::Stateless => Self::Stateless,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatabaseArg {
    #[value(aliases = ["postgresql", "pg"])]
    Postgres,
    Mysql,
    Sqlite,
    #[value(alias = "mongo")]
    Mongodb,
    None,
}

impl From<DatabaseArg> for DatabaseKind {
    fn from(arg: DatabaseArg) -> Self {
        match arg {
            DatabaseArg::Postgres => Self::Postgres,
            DatabaseArg::Mysql => Self::Mysql,
            DatabaseArg::Sqlite => Self::Sqlite,
            DatabaseArg::Mongodb => Self::Mongodb,
            DatabaseArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrmArg {
    Drizzle,
    Prisma,
    Raw,
    None,
}

impl From<OrmArg> for OrmKind {
    fn from(arg: OrmArg) -> Self {
        match arg {
            OrmArg::Drizzle => Self::Drizzle,
            OrmArg::Prisma => Self::Prisma,
            OrmArg::Raw => Self::Raw,
            OrmArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PackageManagerArg {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl From<PackageManagerArg> for PackageManager {
    fn from(arg: PackageManagerArg) -> Self {
        match arg {
            PackageManagerArg::Npm => Self::Npm,
            PackageManagerArg::Pnpm => Self::Pnpm,
            PackageManagerArg::Yarn => Self::Yarn,
            PackageManagerArg::Bun => Self::Bun,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_add_with_defaults() {
        let cli = Cli::parse_from(["stackpatch", "add", "auth"]);
        let Commands::Add(args) = cli.command else {
            panic!("expected Add command");
        };
        assert_eq!(args.patch, "auth");
        assert_eq!(args.target, PathBuf::from("."));
        assert!(!args.auth.any_set());
        assert!(!args.install.yes);
    }

    #[test]
    fn parse_add_auth_flags() {
        let cli = Cli::parse_from([
            "stackpatch",
            "add",
            "auth",
            "./site",
            "--session",
            "stateless",
            "--provider",
            "github,google",
            "--protect",
            "/",
            "--protect",
            "/admin/*",
            "--no-ui",
            "--skip-install",
        ]);
        let Commands::Add(args) = cli.command else {
            panic!("expected Add command");
        };
        assert_eq!(args.target, PathBuf::from("./site"));
        assert_eq!(args.auth.session, Some(SessionArg::Stateless));
        assert_eq!(
            args.auth.providers,
            vec![OAuthProvider::Github, OAuthProvider::Google]
        );
        assert_eq!(args.auth.protected_routes, vec!["/", "/admin/*"]);
        assert!(args.auth.no_ui);
        assert!(args.install.skip_install);
        assert!(args.auth.any_set());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = Cli::try_parse_from(["stackpatch", "add", "auth", "--provider", "myspace"]);
        assert!(result.is_err());
    }

    #[test]
    fn database_aliases() {
        let cli = Cli::parse_from(["stackpatch", "add", "auth", "--database", "pg"]);
        let Commands::Add(args) = cli.command else {
            panic!("expected Add command");
        };
        assert_eq!(args.auth.database, Some(DatabaseArg::Postgres));
        assert_eq!(DatabaseKind::from(DatabaseArg::Postgres), DatabaseKind::Postgres);
    }

    #[test]
    fn parse_create_with_patches() {
        let cli = Cli::parse_from([
            "stackpatch",
            "create",
            "my-app",
            "--patch",
            "auth",
            "--package-manager",
            "pnpm",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected Create command");
        };
        assert_eq!(args.name.as_deref(), Some("my-app"));
        assert_eq!(args.patches, vec!["auth"]);
        assert_eq!(
            args.install.package_manager.map(PackageManager::from),
            Some(PackageManager::Pnpm)
        );
    }

    #[test]
    fn parse_revert() {
        let cli = Cli::parse_from(["stackpatch", "revert", "../app", "-y"]);
        let Commands::Revert(args) = cli.command else {
            panic!("expected Revert command");
        };
        assert_eq!(args.target, PathBuf::from("../app"));
        assert!(args.yes);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stackpatch", "--quiet", "--verbose", "revert"]);
        assert!(result.is_err());
    }
}
