//! Patch installation: scan, copy, generate, edit the layout, install
//! dependencies, then commit by writing the manifest.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{
    dependencies::{missing_packages, required_packages},
    file_copier::FileCopier,
    generator::{CodeGenerator, GeneratedFile, RouteGuardOutcome},
    layout_mutator::LayoutMutator,
    manifest_store::ManifestStore,
    path_resolver::PathResolver,
    scanner::ProjectScanner,
};
use crate::application::{
    ApplicationError,
    ports::{ConfigCollector, ConflictResolver, DependencyInstaller, Filesystem},
};
use crate::domain::{
    AuthConfig, DomainError, ExistingAuth, LayoutEdit, ManifestFiles, PackageManager, PatchName,
    ProjectLayout, ProjectScan, StackPatchManifest, codegen::env::ENV_EXAMPLE,
    codegen::env::ENV_LOCAL,
};
use crate::error::{StackPatchError, StackPatchResult};

/// Components the UI edits place in the root layout.
const AUTH_WRAPPER: (&str, &str) = ("AuthWrapper", "auth/auth-wrapper");
const TOASTER: (&str, &str) = ("Toaster", "toaster");

#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub target: PathBuf,
    pub patch: PatchName,
    /// Directory holding one boilerplate tree per patch.
    pub boilerplate_dir: PathBuf,
    pub skip_dependencies: bool,
    /// Overrides the scanned package manager.
    pub package_manager: Option<PackageManager>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallOutcome {
    pub manifest: StackPatchManifest,
    pub scan: ProjectScan,
    pub config: AuthConfig,
    pub layout: ProjectLayout,
    /// Packages that were missing from `package.json`.
    pub packages: Vec<String>,
    pub dependencies_installed: bool,
    /// Set when packages still need installing by hand.
    pub manual_install_command: Option<String>,
    pub route_guard: Option<String>,
    pub warnings: Vec<String>,
}

pub struct PatchInstaller {
    filesystem: Arc<dyn Filesystem>,
    installer: Box<dyn DependencyInstaller>,
}

impl PatchInstaller {
    pub fn new(filesystem: Arc<dyn Filesystem>, installer: Box<dyn DependencyInstaller>) -> Self {
        Self {
            filesystem,
            installer,
        }
    }

    /// Install `request.patch` into `request.target`.
    ///
    /// Nothing is recorded until the final manifest write. A failure before
    /// that point leaves no manifest, so revert has nothing to undo.
    #[instrument(skip_all, fields(patch = %request.patch, target = %request.target.display()))]
    pub fn install(
        &self,
        request: &InstallRequest,
        collector: &dyn ConfigCollector,
        resolver: &dyn ConflictResolver,
    ) -> StackPatchResult<InstallOutcome> {
        let target = request.target.as_path();
        if !self.filesystem.exists(&target.join("package.json")) {
            return Err(ApplicationError::NotAProject {
                path: target.to_path_buf(),
            }
            .into());
        }

        let scan = ProjectScanner::new(Arc::clone(&self.filesystem)).scan(target);
        let mut warnings = Vec::new();
        if !scan.is_next() {
            warnings.push(format!(
                "This does not look like a Next.js project (framework: {})",
                scan.framework
            ));
        }
        if !matches!(scan.existing_auth, ExistingAuth::None | ExistingAuth::BetterAuth) {
            warnings.push(format!(
                "The project already uses {}; the two setups may conflict",
                scan.existing_auth
            ));
        }

        let config = collector
            .collect(&scan)?
            .ok_or(ApplicationError::Cancelled)?
            .normalized();
        config.validate()?;

        let store = ManifestStore::new(Arc::clone(&self.filesystem));
        let previous = store.read(target);
        let previously_added = previous
            .as_ref()
            .map(|m| m.files.added.clone())
            .unwrap_or_default();

        let layout = PathResolver::new(Arc::clone(&self.filesystem)).resolve_layout(target);
        let mut files = ManifestFiles::default();

        // 1. Boilerplate
        if config.add_ui {
            let patch_dir = request.boilerplate_dir.join(request.patch.as_str());
            let copied = FileCopier::new(Arc::clone(&self.filesystem)).copy(
                &patch_dir,
                target,
                &layout,
                resolver,
                &previously_added,
            )?;
            for original in copied.overwritten {
                files.record_modified(original.path, original.original_content);
            }
            for path in copied.added {
                files.record_added(path);
            }
        }

        // 2. Generated files
        let timestamp = chrono::Utc::now().to_rfc3339();
        let generator = CodeGenerator::new(Arc::clone(&self.filesystem));

        record(&mut files, generator.generate_auth_instance(target, &layout, &config)?);
        record(&mut files, generator.generate_auth_client(target, &layout)?);
        record(&mut files, generator.generate_api_route(target, &layout)?);
        if config.add_ui || !config.protected_routes.is_empty() {
            record(&mut files, generator.generate_protected_routes(target, &layout, &config)?);
        }

        let route_guard = match generator.generate_route_guard(target, &layout, &config, scan.next_major)? {
            RouteGuardOutcome::NotNeeded => None,
            RouteGuardOutcome::Skipped { path } => {
                warnings.push(format!(
                    "{path} already contains auth logic and was left unchanged; protect routes there"
                ));
                None
            }
            RouteGuardOutcome::Written { file, .. } => {
                let path = file.path.clone();
                record(&mut files, file);
                Some(path)
            }
        };

        let env = generator.generate_env_files(target, &config)?;
        record(&mut files, env.example);
        files.record_env_file(ENV_EXAMPLE);
        if env.local.is_some() || env.local_is_ours {
            files.record_env_file(ENV_LOCAL);
        } else {
            warnings.push(format!(
                "{ENV_LOCAL} already exists; copy the new keys from {ENV_EXAMPLE}"
            ));
        }

        record(
            &mut files,
            generator.generate_config_snapshot(target, request.patch, &config, &timestamp)?,
        );

        // 3. Layout
        if config.add_ui {
            self.edit_layout(target, &layout, &mut files, &mut warnings)?;
        }

        // 4. Dependencies
        let packages = missing_packages(
            self.filesystem.as_ref(),
            target,
            &required_packages(&config),
        );
        let package_manager = request.package_manager.unwrap_or(scan.package_manager);
        let mut dependencies_installed = false;
        let mut manual_install_command = None;
        if !packages.is_empty() {
            if request.skip_dependencies {
                manual_install_command = Some(package_manager.manual_command(&packages));
            } else {
                match self.installer.install(target, &packages, package_manager) {
                    Ok(()) => dependencies_installed = true,
                    Err(e) => {
                        warn!(error = %e, "Dependency installation failed");
                        warnings.push(format!("Dependency installation failed: {e}"));
                        manual_install_command = Some(package_manager.manual_command(&packages));
                    }
                }
            }
        }

        // 5. Commit
        let mut manifest = StackPatchManifest::new(
            request.patch.as_str(),
            target.display().to_string(),
            timestamp,
        );
        manifest.dependencies = packages.clone();
        manifest.oauth_providers = config
            .oauth_providers
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        if let Some(previous) = &previous {
            files.carry_forward(&previous.files);
            for dep in &previous.dependencies {
                if !manifest.dependencies.contains(dep) {
                    manifest.dependencies.push(dep.clone());
                }
            }
        }
        files
            .added
            .retain(|path| self.filesystem.exists(&target.join(path)));
        manifest.files = files;

        store.write(target, &manifest)?;
        info!(
            added = manifest.files.added.len(),
            modified = manifest.files.modified.len(),
            "Patch installed"
        );

        Ok(InstallOutcome {
            manifest,
            scan,
            config,
            layout,
            packages,
            dependencies_installed,
            manual_install_command,
            route_guard,
            warnings,
        })
    }

    /// Add the toaster and wrap `{children}` in the auth wrapper.
    fn edit_layout(
        &self,
        target: &Path,
        layout: &ProjectLayout,
        files: &mut ManifestFiles,
        warnings: &mut Vec<String>,
    ) -> StackPatchResult<()> {
        let mutator = LayoutMutator::new(Arc::clone(&self.filesystem));
        let Some(layout_file) = mutator.find_layout(target, layout) else {
            warnings.push(format!(
                "No root layout in {}/; add <AuthWrapper> and <Toaster /> yourself",
                layout.app_dir
            ));
            return Ok(());
        };

        // Toaster first, so the wrapper only encloses `{children}`.
        let edits = [
            LayoutEdit::append(
                TOASTER.0,
                layout.component_import_path(TOASTER.1, &layout_file),
            ),
            LayoutEdit::wrap(
                AUTH_WRAPPER.0,
                layout.component_import_path(AUTH_WRAPPER.1, &layout_file),
            ),
        ];

        for edit in &edits {
            match mutator.mutate(target, &layout_file, edit) {
                Ok(mutation) => {
                    if mutation.modified {
                        files.record_modified(mutation.file_path, mutation.original_content);
                    }
                    if let Some(backup) = mutation.backup_path {
                        files.record_backup(backup);
                    }
                }
                Err(StackPatchError::Domain(e @ DomainError::LayoutAnchorMissing { .. })) => {
                    warn!(error = %e, "Layout edit skipped");
                    warnings.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Generated files that replaced someone else's file are "modified".
fn record(files: &mut ManifestFiles, file: GeneratedFile) {
    if file.replaced_foreign_file() {
        if let Some(original) = file.previous_content {
            files.record_modified(file.path, original);
        }
    } else {
        files.record_added(file.path);
    }
}
