//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `STACKPATCH__*` environment variables, e.g.
//!    `STACKPATCH__INSTALL__PACKAGE_MANAGER=pnpm`
//! 3. The file given with `--config`, or else `./stackpatch.toml` over the
//!    user config file
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use stackpatch_core::domain::PackageManager;

/// Project-local config file name.
pub const LOCAL_CONFIG: &str = "stackpatch.toml";

const ENV_PREFIX: &str = "STACKPATCH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub install: InstallConfig,
    pub boilerplate: BoilerplateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Never run the package manager; print the command instead.
    pub skip_dependencies: bool,
    /// Used instead of the detected package manager.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerplateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Layer defaults, config files and the environment.
    ///
    /// A file passed with `--config` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder
                .add_source(config::File::from(Self::config_path().as_path()).required(false))
                .add_source(config::File::from(Path::new(LOCAL_CONFIG)).required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// The user config file: `<config dir>/stackpatch/config.toml`, or
    /// `./stackpatch.toml` when no home directory is known.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stackpatch", "stackpatch")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    /// `install.package_manager`, parsed.
    pub fn package_manager(&self) -> anyhow::Result<Option<PackageManager>> {
        self.install
            .package_manager
            .as_deref()
            .map(|pm| {
                PackageManager::from_str(pm)
                    .with_context(|| format!("install.package_manager = '{pm}'"))
            })
            .transpose()
    }
}
