//! npm packages the auth patch needs, and `package.json` bookkeeping.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::{
    AuthConfig, DatabaseKind,
    codegen::auth_instance::{AuthInstanceOptions, DatabaseAdapter},
};
use crate::error::{Context, StackPatchResult};

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies"];

/// Packages the generated code imports, in install order.
pub fn required_packages(config: &AuthConfig) -> Vec<String> {
    let mut packages = vec!["better-auth"];

    match AuthInstanceOptions::new(config).adapter() {
        Some(DatabaseAdapter::Drizzle(DatabaseKind::Mongodb))
        | Some(DatabaseAdapter::Raw(DatabaseKind::Mongodb)) => packages.push("mongodb"),
        Some(DatabaseAdapter::Drizzle(kind)) => {
            packages.push("drizzle-orm");
            packages.extend(kind.driver_package());
        }
        Some(DatabaseAdapter::Prisma(_)) => packages.push("@prisma/client"),
        Some(DatabaseAdapter::Raw(kind)) => packages.extend(kind.driver_package()),
        None => {}
    }

    if config.add_ui {
        packages.push("sonner");
    }

    packages.into_iter().map(str::to_string).collect()
}

/// The subset of `packages` not declared in `package.json`.
pub fn missing_packages(
    filesystem: &dyn Filesystem,
    target: &Path,
    packages: &[String],
) -> Vec<String> {
    let declared = filesystem
        .read_to_string(&target.join("package.json"))
        .ok()
        .and_then(|raw| serde_json::from_str::<Value>(&raw).ok());

    packages
        .iter()
        .filter(|name| {
            !declared.as_ref().is_some_and(|package| {
                DEPENDENCY_SECTIONS
                    .iter()
                    .any(|section| package.get(section).and_then(|s| s.get(name.as_str())).is_some())
            })
        })
        .cloned()
        .collect()
}

/// Delete `packages` from both dependency sections of `package.json`.
///
/// The file is rewritten only if something was removed; key order is kept.
/// Returns the names that were removed.
#[instrument(skip_all, fields(count = packages.len()))]
pub fn remove_dependencies(
    filesystem: &dyn Filesystem,
    target: &Path,
    packages: &[String],
) -> StackPatchResult<Vec<String>> {
    let path = target.join("package.json");
    let raw = filesystem.read_to_string(&path)?;
    let mut package: Value = serde_json::from_str(&raw).context("package.json")?;

    let mut removed = Vec::new();
    for section in DEPENDENCY_SECTIONS {
        if let Some(Value::Object(deps)) = package.get_mut(*section) {
            for name in packages {
                if deps.shift_remove(name).is_some() && !removed.contains(name) {
                    removed.push(name.clone());
                }
            }
        }
    }

    if !removed.is_empty() {
        let mut json = serde_json::to_string_pretty(&package).context("package.json")?;
        json.push('\n');
        filesystem.write_file(&path, &json)?;
        debug!(?removed, "Dependencies removed from package.json");
    }
    Ok(removed)
}
