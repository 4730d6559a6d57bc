//! Domain value objects: patch names, auth choices and project facts.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Each carries its wire name (`as_str`), a `Display` impl over it and a
//! `FromStr` parser that accepts the same names the CLI and the config
//! snapshot use.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Teach the renderer in `codegen/` what to emit for it

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Implements `Display` via `as_str` for a value object.
macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

// ── PatchName ────────────────────────────────────────────────────────────────

/// A patch that can be applied to a project.
///
/// Each patch owns a subtree `boilerplate/<name>/` shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchName {
    Auth,
}

impl PatchName {
    pub const ALL: &'static [PatchName] = &[PatchName::Auth];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
        }
    }
}

impl FromStr for PatchName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auth" | "authentication" => Ok(Self::Auth),
            other => Err(DomainError::UnknownPatch { name: other.into() }),
        }
    }
}

// ── SessionMode ──────────────────────────────────────────────────────────────

/// Where sessions live.
///
/// `Stateless` keeps the session in an encrypted cookie and forbids any
/// database code in the generated auth instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Database,
    Stateless,
}

impl SessionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Stateless => "stateless",
        }
    }
}

impl FromStr for SessionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "stateless" | "jwt" | "cookie" => Ok(Self::Stateless),
            other => Err(DomainError::InvalidValue {
                field: "session mode",
                value: other.into(),
            }),
        }
    }
}

// ── DatabaseKind ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
    Mongodb,
    None,
}

impl DatabaseKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Mongodb => "mongodb",
            Self::None => "none",
        }
    }

    /// Provider name expected by the Drizzle and Prisma adapters.
    pub const fn adapter_provider(&self) -> &'static str {
        match self {
            Self::Postgres => "pg",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Mongodb => "mongodb",
            Self::None => "",
        }
    }

    /// npm package of the raw driver for this database.
    pub const fn driver_package(&self) -> Option<&'static str> {
        match self {
            Self::Postgres => Some("pg"),
            Self::Mysql => Some("mysql2"),
            Self::Sqlite => Some("better-sqlite3"),
            Self::Mongodb => Some("mongodb"),
            Self::None => None,
        }
    }
}

impl FromStr for DatabaseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "none" => Ok(Self::None),
            other => Err(DomainError::InvalidValue {
                field: "database",
                value: other.into(),
            }),
        }
    }
}

// ── OrmKind ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrmKind {
    #[default]
    Drizzle,
    Prisma,
    Raw,
    None,
}

impl OrmKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drizzle => "drizzle",
            Self::Prisma => "prisma",
            Self::Raw => "raw",
            Self::None => "none",
        }
    }
}

impl FromStr for OrmKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drizzle" => Ok(Self::Drizzle),
            "prisma" => Ok(Self::Prisma),
            "raw" | "driver" => Ok(Self::Raw),
            "none" => Ok(Self::None),
            other => Err(DomainError::InvalidValue {
                field: "orm",
                value: other.into(),
            }),
        }
    }
}

// ── OAuthProvider ────────────────────────────────────────────────────────────

/// Social sign-in providers the generated auth instance can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
    Discord,
    Gitlab,
    Microsoft,
    Apple,
    Twitter,
    Facebook,
    Linkedin,
    Spotify,
    Twitch,
}

impl OAuthProvider {
    pub const ALL: &'static [OAuthProvider] = &[
        Self::Google,
        Self::Github,
        Self::Discord,
        Self::Gitlab,
        Self::Microsoft,
        Self::Apple,
        Self::Twitter,
        Self::Facebook,
        Self::Linkedin,
        Self::Spotify,
        Self::Twitch,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Discord => "discord",
            Self::Gitlab => "gitlab",
            Self::Microsoft => "microsoft",
            Self::Apple => "apple",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Linkedin => "linkedin",
            Self::Spotify => "spotify",
            Self::Twitch => "twitch",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Discord => "Discord",
            Self::Gitlab => "GitLab",
            Self::Microsoft => "Microsoft",
            Self::Apple => "Apple",
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Linkedin => "LinkedIn",
            Self::Spotify => "Spotify",
            Self::Twitch => "Twitch",
        }
    }

    /// `GITHUB_CLIENT_ID`
    pub fn client_id_var(&self) -> String {
        format!("{}_CLIENT_ID", self.as_str().to_ascii_uppercase())
    }

    /// `GITHUB_CLIENT_SECRET`
    pub fn client_secret_var(&self) -> String {
        format!("{}_CLIENT_SECRET", self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for OAuthProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or(DomainError::InvalidValue {
                field: "oauth provider",
                value: wanted,
            })
    }
}

// ── Project facts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    Next,
    React,
    Vite,
    #[default]
    Unknown,
}

impl FrameworkKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::React => "react",
            Self::Vite => "vite",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    App,
    Pages,
    #[default]
    Unknown,
}

impl RouterKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Pages => "pages",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Program and arguments that add `packages` to a project.
    pub fn install_command(&self, packages: &[String]) -> (&'static str, Vec<String>) {
        let verb = match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        };
        let mut args = Vec::with_capacity(packages.len() + 1);
        args.push(verb.to_string());
        args.extend(packages.iter().cloned());
        (self.as_str(), args)
    }

    /// The install command as a copy-pasteable shell line.
    pub fn manual_command(&self, packages: &[String]) -> String {
        let (program, args) = self.install_command(packages);
        format!("{program} {}", args.join(" "))
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::InvalidValue {
                field: "package manager",
                value: other.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[default]
    Node,
    Bun,
}

impl Runtime {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Bun => "bun",
        }
    }
}

/// An auth library already present in the project's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingAuth {
    #[default]
    None,
    BetterAuth,
    NextAuth,
    Clerk,
    Supabase,
}

impl ExistingAuth {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BetterAuth => "better-auth",
            Self::NextAuth => "next-auth",
            Self::Clerk => "clerk",
            Self::Supabase => "supabase",
        }
    }
}

display_as_str!(
    PatchName,
    SessionMode,
    DatabaseKind,
    OrmKind,
    OAuthProvider,
    FrameworkKind,
    RouterKind,
    PackageManager,
    Runtime,
    ExistingAuth,
);
