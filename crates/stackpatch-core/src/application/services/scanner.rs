//! Read-only project inspection.

use std::path::Path;
use std::sync::Arc;

use semver::VersionReq;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::{
    ExistingAuth, FrameworkKind, PackageManager, ProjectScan, RouterKind, Runtime,
};

/// Lock files in detection order.
const LOCK_FILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

/// Inspects a directory without modifying it.
///
/// Every check degrades to a default: a missing or malformed `package.json`
/// yields an unknown framework, never an error.
pub struct ProjectScanner {
    filesystem: Arc<dyn Filesystem>,
}

impl ProjectScanner {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    #[instrument(skip_all, fields(target = %target.display()))]
    pub fn scan(&self, target: &Path) -> ProjectScan {
        let package = self.read_package_json(target);
        let deps = package.as_ref().map(all_dependencies).unwrap_or_default();
        let has = |name: &str| deps.contains_key(name);

        let framework = if has("next") {
            FrameworkKind::Next
        } else if has("vite") {
            FrameworkKind::Vite
        } else if has("react") {
            FrameworkKind::React
        } else {
            FrameworkKind::Unknown
        };

        let dir = |rel: &str| self.filesystem.is_dir(&target.join(rel));
        let router = if dir("src/app") || dir("app") {
            RouterKind::App
        } else if dir("src/pages") || dir("pages") {
            RouterKind::Pages
        } else {
            RouterKind::Unknown
        };

        let typescript = self.filesystem.exists(&target.join("tsconfig.json")) || has("typescript");
        let package_manager = self.detect_package_manager(target, package.as_ref());
        let runtime = if package_manager == PackageManager::Bun || has("@types/bun") || has("bun-types") {
            Runtime::Bun
        } else {
            Runtime::Node
        };

        let existing_auth = if has("better-auth") {
            ExistingAuth::BetterAuth
        } else if has("next-auth") || has("@auth/core") {
            ExistingAuth::NextAuth
        } else if has("@clerk/nextjs") {
            ExistingAuth::Clerk
        } else if has("@supabase/auth-helpers-nextjs") || has("@supabase/ssr") {
            ExistingAuth::Supabase
        } else {
            ExistingAuth::None
        };

        let next_version = deps.get("next").and_then(Value::as_str).map(str::to_string);
        let next_major = next_version.as_deref().and_then(parse_major);

        let scan = ProjectScan {
            framework,
            router,
            typescript,
            package_manager,
            runtime,
            has_src_dir: dir("src"),
            existing_auth,
            next_version,
            next_major,
        };
        debug!(?scan, "Project scanned");
        scan
    }

    fn read_package_json(&self, target: &Path) -> Option<Value> {
        let raw = self
            .filesystem
            .read_to_string(&target.join("package.json"))
            .ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "package.json is not valid JSON");
                None
            }
        }
    }

    fn detect_package_manager(&self, target: &Path, package: Option<&Value>) -> PackageManager {
        for (file, manager) in LOCK_FILES {
            if self.filesystem.exists(&target.join(file)) {
                return *manager;
            }
        }

        // "packageManager": "pnpm@9.1.0"
        package
            .and_then(|p| p.get("packageManager"))
            .and_then(Value::as_str)
            .and_then(|field| field.split('@').next())
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }
}

/// `dependencies` and `devDependencies` merged; runtime entries win.
fn all_dependencies(package: &Value) -> Map<String, Value> {
    let mut deps = Map::new();
    for key in ["devDependencies", "dependencies"] {
        if let Some(Value::Object(section)) = package.get(key) {
            for (name, version) in section {
                deps.insert(name.clone(), version.clone());
            }
        }
    }
    deps
}

/// Major version from an npm range such as `^15.1.0`, `~14.2`, `16`.
///
/// Dist tags (`latest`, `canary`) have no major and yield `None`.
pub fn parse_major(range: &str) -> Option<u64> {
    let range = range.trim();
    if range.is_empty() {
        return None;
    }
    if let Ok(req) = VersionReq::parse(range) {
        if let Some(first) = req.comparators.first() {
            return Some(first.major);
        }
    }

    // npm ranges semver does not accept, e.g. `15.x || 16.x` or `npm:next@15`
    let start = range.find(|c: char| c.is_ascii_digit())?;
    let digits: String = range[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
