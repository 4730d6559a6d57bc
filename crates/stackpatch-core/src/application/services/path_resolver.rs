//! Canonical directories and import alias of a target project.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::{ImportAlias, ProjectLayout};

/// App directory candidates, first existing wins.
const APP_DIR_CANDIDATES: &[&str] = &["src/app", "app", "src/pages", "pages"];

pub struct PathResolver {
    filesystem: Arc<dyn Filesystem>,
}

impl PathResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// `src/app`, `app`, `src/pages`, `pages`, else `app`.
    pub fn resolve_app_dir(&self, target: &Path) -> String {
        APP_DIR_CANDIDATES
            .iter()
            .find(|dir| self.filesystem.is_dir(&target.join(dir)))
            .copied()
            .unwrap_or("app")
            .to_string()
    }

    /// Follows the app directory's `src/`-ness, whether or not it exists yet.
    pub fn resolve_components_dir(&self, target: &Path) -> String {
        ProjectLayout::for_app_dir(self.resolve_app_dir(target), None).components_dir
    }

    pub fn resolve_lib_dir(&self, target: &Path) -> String {
        ProjectLayout::for_app_dir(self.resolve_app_dir(target), None).lib_dir
    }

    /// First `compilerOptions.paths` entry of `tsconfig.json`.
    ///
    /// Missing or unparseable config yields `None`.
    pub fn resolve_import_alias(&self, target: &Path) -> Option<ImportAlias> {
        let raw = self
            .filesystem
            .read_to_string(&target.join("tsconfig.json"))
            .ok()?;
        let config: Value = match serde_json::from_str(&strip_jsonc(&raw)) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "tsconfig.json could not be parsed");
                return None;
            }
        };

        let paths = config.get("compilerOptions")?.get("paths")?.as_object()?;
        let (key, targets) = paths.iter().next()?;
        let first = targets.as_array()?.first()?.as_str()?;
        Some(ImportAlias::from_mapping(key, first))
    }

    #[instrument(skip_all, fields(target = %target.display()))]
    pub fn resolve_layout(&self, target: &Path) -> ProjectLayout {
        let layout =
            ProjectLayout::for_app_dir(self.resolve_app_dir(target), self.resolve_import_alias(target));
        debug!(
            app = %layout.app_dir,
            components = %layout.components_dir,
            alias = ?layout.alias.as_ref().map(|a| &a.alias),
            "Layout resolved"
        );
        layout
    }

    /// Import specifier for a component as seen from `from_file`.
    pub fn component_import_path(&self, target: &Path, component: &str, from_file: &str) -> String {
        self.resolve_layout(target)
            .component_import_path(component, from_file)
    }
}

/// Drop `//` and `/* */` comments and trailing commas, leaving string
/// literals untouched.
pub fn strip_jsonc(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    remove_trailing_commas(&out)
}

fn remove_trailing_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                i += 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_trailing_commas_are_removed() {
        let src = r#"{
  // Next.js defaults
  "compilerOptions": {
    /* aliases */
    "paths": { "@/*": ["./*"], },
  },
}"#;
        let value: Value = serde_json::from_str(&strip_jsonc(src)).unwrap();
        assert_eq!(value["compilerOptions"]["paths"]["@/*"][0], "./*");
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let src = r#"{ "url": "http://example.com/*x*/", "a": "b,}" }"#;
        let value: Value = serde_json::from_str(&strip_jsonc(src)).unwrap();
        assert_eq!(value["url"], "http://example.com/*x*/");
        assert_eq!(value["a"], "b,}");
    }
}
