//! Writes the generator-owned files of the auth patch.
//!
//! Each `generate_*` method writes exactly one file, replacing whatever was
//! there, and reports the replaced content so the installer can decide
//! between "added" and "modified".

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::Filesystem;
use crate::domain::{
    AuthConfig, PatchName, ProjectLayout,
    codegen::{
        api_route::{self, ApiRouteOptions},
        auth_client,
        auth_instance::{self, AuthInstanceOptions},
        config_snapshot::{self, CONFIG_SNAPSHOT_FILE, ConfigSnapshot},
        env::{self, ENV_EXAMPLE, ENV_LOCAL, EnvTemplateOptions},
        is_generated,
        protected_routes::{self, ProtectedRoutesOptions},
        route_guard::{self, GuardConvention, RouteGuardOptions, has_auth_logic},
    },
};
use crate::error::{Context, StackPatchResult};

/// A file written by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Project-relative path.
    pub path: String,
    /// Content that was replaced, if the file existed.
    pub previous_content: Option<String>,
}

impl GeneratedFile {
    /// The replaced file was written by someone else.
    pub fn replaced_foreign_file(&self) -> bool {
        self.previous_content
            .as_deref()
            .is_some_and(|content| !is_generated(content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteGuardOutcome {
    /// No protected routes.
    NotNeeded,
    /// An existing guard already does auth and was left alone.
    Skipped { path: String },
    Written {
        file: GeneratedFile,
        /// Our file under the other naming convention, now deleted.
        removed_stale: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOutcome {
    pub example: GeneratedFile,
    /// `None` when `.env.local` already existed.
    pub local: Option<GeneratedFile>,
    /// The existing `.env.local` is ours and stays tracked.
    pub local_is_ours: bool,
}

/// Every output path the generator may own for `layout`.
///
/// Revert treats a path in this set as a StackPatch file only if it still
/// carries the generation marker.
pub fn generator_owned_paths(layout: &ProjectLayout) -> Vec<String> {
    vec![
        format!("{}/auth.ts", layout.lib_dir),
        format!("{}/auth-client.ts", layout.lib_dir),
        format!("{}/protected-routes.ts", layout.lib_dir),
        ApiRouteOptions::new(layout).path,
        layout.in_source_root(GuardConvention::Proxy.file_name()),
        layout.in_source_root(GuardConvention::Middleware.file_name()),
        ENV_EXAMPLE.to_string(),
        ENV_LOCAL.to_string(),
        CONFIG_SNAPSHOT_FILE.to_string(),
    ]
}

pub struct CodeGenerator {
    filesystem: Arc<dyn Filesystem>,
}

impl CodeGenerator {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    // ── lib/ ───────────────────────────────────────────────────────────

    #[instrument(skip_all)]
    pub fn generate_auth_instance(
        &self,
        target: &Path,
        layout: &ProjectLayout,
        config: &AuthConfig,
    ) -> StackPatchResult<GeneratedFile> {
        let options = AuthInstanceOptions::new(config);
        debug!(adapter = ?options.adapter(), stateless = options.is_stateless(), "Auth instance options");
        let path = format!("{}/auth.ts", layout.lib_dir);
        self.replace_file(target, &path, &auth_instance::render(&options))
    }

    pub fn generate_auth_client(
        &self,
        target: &Path,
        layout: &ProjectLayout,
    ) -> StackPatchResult<GeneratedFile> {
        let path = format!("{}/auth-client.ts", layout.lib_dir);
        self.replace_file(target, &path, &auth_client::render())
    }

    pub fn generate_protected_routes(
        &self,
        target: &Path,
        layout: &ProjectLayout,
        config: &AuthConfig,
    ) -> StackPatchResult<GeneratedFile> {
        let path = format!("{}/protected-routes.ts", layout.lib_dir);
        let options = ProtectedRoutesOptions::new(config);
        self.replace_file(target, &path, &protected_routes::render(&options))
    }

    // ── app/ ───────────────────────────────────────────────────────────

    pub fn generate_api_route(
        &self,
        target: &Path,
        layout: &ProjectLayout,
    ) -> StackPatchResult<GeneratedFile> {
        let options = ApiRouteOptions::new(layout);
        self.replace_file(target, &options.path, &api_route::render(&options))
    }

    // ── route guard ────────────────────────────────────────────────────

    #[instrument(skip_all, fields(next_major = ?next_major))]
    pub fn generate_route_guard(
        &self,
        target: &Path,
        layout: &ProjectLayout,
        config: &AuthConfig,
        next_major: Option<u64>,
    ) -> StackPatchResult<RouteGuardOutcome> {
        let Some(options) = RouteGuardOptions::new(config, next_major) else {
            return Ok(RouteGuardOutcome::NotNeeded);
        };

        let path = layout.in_source_root(options.convention.file_name());
        if let Ok(existing) = self.filesystem.read_to_string(&target.join(&path)) {
            if has_auth_logic(&existing) && !is_generated(&existing) {
                warn!(file = %path, "Existing route guard already handles auth; leaving it untouched");
                return Ok(RouteGuardOutcome::Skipped { path });
            }
        }

        let stale = layout.in_source_root(options.convention.other().file_name());
        let stale_path = target.join(&stale);
        let removed_stale = match self.filesystem.read_to_string(&stale_path) {
            Ok(content) if is_generated(&content) => {
                self.filesystem.remove_file(&stale_path)?;
                info!(file = %stale, "Removed route guard written for the other Next.js convention");
                Some(stale)
            }
            _ => None,
        };

        let file = self.replace_file(target, &path, &route_guard::render(&options))?;
        Ok(RouteGuardOutcome::Written { file, removed_stale })
    }

    // ── project root ───────────────────────────────────────────────────

    #[instrument(skip_all)]
    pub fn generate_env_files(
        &self,
        target: &Path,
        config: &AuthConfig,
    ) -> StackPatchResult<EnvOutcome> {
        let options = EnvTemplateOptions::new(config);
        let example = self.replace_file(target, ENV_EXAMPLE, &env::render_example(&options))?;

        let local_path = target.join(ENV_LOCAL);
        if self.filesystem.exists(&local_path) {
            let local_is_ours = self
                .filesystem
                .read_to_string(&local_path)
                .map(|content| is_generated(&content))
                .unwrap_or(false);
            if !local_is_ours {
                warn!("{ENV_LOCAL} already exists; add the keys from {ENV_EXAMPLE} to it manually");
            }
            return Ok(EnvOutcome {
                example,
                local: None,
                local_is_ours,
            });
        }

        let secret = env::generate_secret();
        let local = self.replace_file(target, ENV_LOCAL, &env::render_local(&options, &secret))?;
        Ok(EnvOutcome {
            example,
            local: Some(local),
            local_is_ours: true,
        })
    }

    pub fn generate_config_snapshot(
        &self,
        target: &Path,
        patch: PatchName,
        config: &AuthConfig,
        generated_at: &str,
    ) -> StackPatchResult<GeneratedFile> {
        let snapshot = ConfigSnapshot::new(patch, config, generated_at);
        let content = config_snapshot::render(&snapshot).context(CONFIG_SNAPSHOT_FILE)?;
        self.replace_file(target, CONFIG_SNAPSHOT_FILE, &content)
    }

    /// Remove any existing file at `path`, then write `content`.
    fn replace_file(&self, target: &Path, path: &str, content: &str) -> StackPatchResult<GeneratedFile> {
        let full = target.join(path);
        let previous_content = if self.filesystem.exists(&full) {
            let previous = self.filesystem.read_to_string(&full).ok();
            self.filesystem.remove_file(&full)?;
            previous
        } else {
            None
        };

        self.filesystem.write_file_all(&full, content)?;
        debug!(file = %path, replaced = previous_content.is_some(), "Generated");
        Ok(GeneratedFile {
            path: path.to_string(),
            previous_content,
        })
    }
}
