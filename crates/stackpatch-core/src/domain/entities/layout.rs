//! Where things live inside a target project, and how to import them.
//!
//! All paths here are project-relative and use `/` separators regardless of
//! platform, because they end up inside TypeScript import specifiers and
//! the manifest.

use serde::Serialize;

/// A `compilerOptions.paths` alias from `tsconfig.json`.
///
/// `"@/*": ["./src/*"]` becomes `alias = "@"`, `base_path = "src"`.
/// A root mapping (`"./*"`) has an empty `base_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportAlias {
    pub alias: String,
    pub base_path: String,
}

impl ImportAlias {
    /// Build from the raw tsconfig key and first target, stripping `/*`.
    pub fn from_mapping(key: &str, target: &str) -> Self {
        Self {
            alias: key.trim_end_matches("/*").trim_end_matches('/').to_string(),
            base_path: normalize_dir(target.trim_end_matches("/*")),
        }
    }
}

/// Resolved directory layout of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    pub app_dir: String,
    pub components_dir: String,
    pub lib_dir: String,
    pub alias: Option<ImportAlias>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            app_dir: "app".into(),
            components_dir: "components".into(),
            lib_dir: "lib".into(),
            alias: None,
        }
    }
}

impl ProjectLayout {
    /// Layout for a project whose app directory is `app_dir`.
    ///
    /// `components` and `lib` follow the app directory's `src/`-ness.
    pub fn for_app_dir(app_dir: impl Into<String>, alias: Option<ImportAlias>) -> Self {
        let app_dir = app_dir.into();
        let (components_dir, lib_dir) = if app_dir.starts_with("src/") {
            ("src/components".to_string(), "src/lib".to_string())
        } else {
            ("components".to_string(), "lib".to_string())
        };
        Self {
            app_dir,
            components_dir,
            lib_dir,
            alias,
        }
    }

    /// Pages router: the resolved directory is `pages` or `src/pages`.
    pub fn uses_pages_router(&self) -> bool {
        self.app_dir.rsplit('/').next() == Some("pages")
    }

    pub fn uses_src(&self) -> bool {
        self.app_dir.starts_with("src/")
    }

    /// Directory holding root-level source files such as the route guard.
    pub fn source_root(&self) -> &'static str {
        if self.uses_src() { "src" } else { "" }
    }

    /// Join a file name onto [`Self::source_root`].
    pub fn in_source_root(&self, file: &str) -> String {
        join_rel(self.source_root(), file)
    }

    /// Import specifier for `component` (e.g. `auth/auth-wrapper`) as seen
    /// from `from_file`.
    pub fn component_import_path(&self, component: &str, from_file: &str) -> String {
        self.module_import_path(&self.components_dir, component, from_file)
    }

    /// Import specifier for `module` inside the lib directory.
    pub fn lib_import_path(&self, module: &str, from_file: &str) -> String {
        self.module_import_path(&self.lib_dir, module, from_file)
    }

    /// Alias-relative specifier when the alias base contains `dir`,
    /// otherwise a relative one from `from_file`'s directory.
    pub fn module_import_path(&self, dir: &str, module: &str, from_file: &str) -> String {
        let target = join_rel(dir, module);

        if let Some(alias) = &self.alias {
            if let Some(rest) = strip_dir_prefix(&target, &alias.base_path) {
                return format!("{}/{}", alias.alias, rest);
            }
        }

        relative_specifier(from_file, &target)
    }
}

/// `./src/` → `src`, `.` → ``.
fn normalize_dir(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches("./").trim_end_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn join_rel(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

/// `target` with the directory `base` removed, if `base` contains it.
fn strip_dir_prefix<'a>(target: &'a str, base: &str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(target);
    }
    target
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
}

fn relative_specifier(from_file: &str, target: &str) -> String {
    let from_dir: Vec<&str> = from_file
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .split_last()
        .map(|(_, dir)| dir.to_vec())
        .unwrap_or_default();
    let target_parts: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dir.len() - common;
    let rest = target_parts[common..].join("/");

    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_alias() -> Option<ImportAlias> {
        Some(ImportAlias::from_mapping("@/*", "./*"))
    }

    #[test]
    fn alias_mapping_strips_wildcards() {
        let alias = ImportAlias::from_mapping("@/*", "./src/*");
        assert_eq!(alias.alias, "@");
        assert_eq!(alias.base_path, "src");

        let alias = ImportAlias::from_mapping("~/*", "./*");
        assert_eq!(alias.alias, "~");
        assert_eq!(alias.base_path, "");
    }

    #[test]
    fn src_app_dir_moves_components_and_lib() {
        let layout = ProjectLayout::for_app_dir("src/app", None);
        assert_eq!(layout.components_dir, "src/components");
        assert_eq!(layout.lib_dir, "src/lib");
        assert_eq!(layout.in_source_root("proxy.ts"), "src/proxy.ts");

        let layout = ProjectLayout::for_app_dir("app", None);
        assert_eq!(layout.components_dir, "components");
        assert_eq!(layout.in_source_root("proxy.ts"), "proxy.ts");
    }

    #[test]
    fn pages_router_detection() {
        assert!(ProjectLayout::for_app_dir("pages", None).uses_pages_router());
        assert!(ProjectLayout::for_app_dir("src/pages", None).uses_pages_router());
        assert!(!ProjectLayout::for_app_dir("src/app", None).uses_pages_router());
    }

    #[test]
    fn root_alias_gives_alias_import() {
        let layout = ProjectLayout::for_app_dir("app", root_alias());
        assert_eq!(
            layout.component_import_path("auth/auth-wrapper", "app/layout.tsx"),
            "@/components/auth/auth-wrapper"
        );
    }

    #[test]
    fn src_alias_strips_base() {
        let layout =
            ProjectLayout::for_app_dir("src/app", Some(ImportAlias::from_mapping("@/*", "./src/*")));
        assert_eq!(
            layout.lib_import_path("auth", "src/app/api/auth/[...all]/route.ts"),
            "@/lib/auth"
        );
    }

    #[test]
    fn alias_not_covering_components_falls_back_to_relative() {
        let layout =
            ProjectLayout::for_app_dir("app", Some(ImportAlias::from_mapping("@/*", "./src/*")));
        assert_eq!(
            layout.component_import_path("toaster", "app/layout.tsx"),
            "../components/toaster"
        );
    }

    #[test]
    fn no_alias_relative_from_nested_route() {
        let layout = ProjectLayout::default();
        assert_eq!(
            layout.lib_import_path("auth", "app/api/auth/[...all]/route.ts"),
            "../../../../lib/auth"
        );
    }

    #[test]
    fn sibling_directory_uses_dot_slash() {
        let layout = ProjectLayout::default();
        assert_eq!(
            layout.component_import_path("toaster", "components/auth/x.tsx"),
            "../toaster"
        );
        assert_eq!(layout.lib_import_path("auth", "lib/auth-client.ts"), "./auth");
    }

    #[test]
    fn same_inputs_same_output() {
        let layout = ProjectLayout::for_app_dir("app", root_alias());
        let a = layout.component_import_path("x", "app/a/page.tsx");
        let b = layout.component_import_path("x", "app/a/page.tsx");
        assert_eq!(a, b);
    }
}
