//! Text edits on a root `layout.tsx`.
//!
//! Both edits are idempotent: an edit whose component identifier already
//! appears anywhere in the file is treated as applied. That check is a plain
//! substring match.

use crate::domain::error::DomainError;

const CHILDREN: &str = "{children}";

/// How a component is placed relative to `{children}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `<C>{children}</C>`
    Wrap,
    /// `{children}` followed by `<C />`
    Append,
}

/// One component insertion into the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdit {
    /// JSX identifier, also used for the "already applied" check.
    pub component: String,
    /// Import specifier, e.g. `@/components/auth/auth-wrapper`.
    pub import_from: String,
    pub placement: Placement,
}

impl LayoutEdit {
    pub fn wrap(component: impl Into<String>, import_from: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            import_from: import_from.into(),
            placement: Placement::Wrap,
        }
    }

    pub fn append(component: impl Into<String>, import_from: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            import_from: import_from.into(),
            placement: Placement::Append,
        }
    }

    pub fn import_line(&self) -> String {
        format!("import {{ {} }} from \"{}\";", self.component, self.import_from)
    }

    pub fn is_applied(&self, source: &str) -> bool {
        source.contains(&self.component)
    }

    /// The edited source, or `None` if the edit is already present.
    pub fn apply(&self, source: &str, file: &str) -> Result<Option<String>, DomainError> {
        if self.is_applied(source) {
            return Ok(None);
        }

        let with_import = insert_import(source, &self.import_line());
        let edited = match self.placement {
            Placement::Wrap => wrap_children(&with_import, &self.component),
            Placement::Append => append_after_children(&with_import, &self.component),
        };

        edited
            .map(Some)
            .ok_or_else(|| DomainError::LayoutAnchorMissing {
                component: self.component.clone(),
                file: file.into(),
            })
    }
}

/// Insert `import_line` after the last top-level import.
///
/// Scanning stops at the first line that is not an import, a comment or
/// blank once an import has been seen. Multi-line `import { ... } from`
/// statements are followed to their closing line. With no imports the line
/// goes after the first line of the file.
pub fn insert_import(source: &str, import_line: &str) -> String {
    let eol = line_ending(source);
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return format!("{import_line}{eol}");
    }

    let mut last_import: Option<usize> = None;
    let mut in_import = false;
    let mut in_block_comment = false;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if in_import {
            if trimmed.contains(" from ") || trimmed.starts_with('}') || trimmed.ends_with(';') {
                in_import = false;
                last_import = Some(idx);
            }
            continue;
        }
        if in_block_comment {
            if trimmed.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }

        if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
            let complete = trimmed.contains(" from ")
                || trimmed.starts_with("import \"")
                || trimmed.starts_with("import '")
                || trimmed.ends_with(';');
            if complete {
                last_import = Some(idx);
            } else {
                in_import = true;
            }
            continue;
        }
        if trimmed.starts_with("/*") {
            in_block_comment = !trimmed.contains("*/");
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if last_import.is_some() {
            break;
        }
    }

    let insert_at = last_import.map_or(1, |idx| idx + 1);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..insert_at.min(lines.len())]);
    out.push(import_line);
    out.extend_from_slice(&lines[insert_at.min(lines.len())..]);

    let mut joined = out.join(eol);
    if source.ends_with('\n') {
        joined.push_str(eol);
    }
    joined
}

/// `\r\n` when the file already uses it, else `\n`.
fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Wrap the first `{children}` in `<component>`, falling back to the
/// trimmed inner content of `<body>`.
pub fn wrap_children(source: &str, component: &str) -> Option<String> {
    if let Some(pos) = source.find(CHILDREN) {
        let mut out = String::with_capacity(source.len() + component.len() * 2 + 8);
        out.push_str(&source[..pos]);
        out.push_str(&format!("<{component}>{CHILDREN}</{component}>"));
        out.push_str(&source[pos + CHILDREN.len()..]);
        return Some(out);
    }

    let (inner_start, inner_end) = body_inner_range(source)?;
    let inner = &source[inner_start..inner_end];
    let trimmed = inner.trim();
    let lead = &inner[..inner.len() - inner.trim_start().len()];
    let trail = &inner[inner.trim_end().len()..];

    Some(format!(
        "{}{lead}<{component}>{trimmed}</{component}>{trail}{}",
        &source[..inner_start],
        &source[inner_end..]
    ))
}

/// Place `<component />` right after the first `{children}`, falling back to
/// the end of the `<body>` content.
pub fn append_after_children(source: &str, component: &str) -> Option<String> {
    let element = format!("<{component} />");

    if let Some(pos) = source.find(CHILDREN) {
        let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
        let indent: String = source[line_start..pos]
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect();
        let end = pos + CHILDREN.len();
        return Some(format!(
            "{}{}{indent}{element}{}",
            &source[..end],
            line_ending(source),
            &source[end..]
        ));
    }

    let (inner_start, inner_end) = body_inner_range(source)?;
    let inner = &source[inner_start..inner_end];
    let content_end = inner_start + inner.trim_end().len();
    Some(format!(
        "{}{element}{}",
        &source[..content_end],
        &source[content_end..]
    ))
}

/// Byte range between `<body ...>` and `</body>`.
fn body_inner_range(source: &str) -> Option<(usize, usize)> {
    let open = source.find("<body")?;
    let open_end = open + source[open..].find('>')? + 1;
    let close = open_end + source[open_end..].find("</body>")?;
    Some((open_end, close))
}
