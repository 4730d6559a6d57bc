//! Source renderers for the files the auth patch generates.
//!
//! Each output file has an options struct built from the normalized
//! [`AuthConfig`](crate::domain::AuthConfig) and a `render` function that
//! turns it into text. Selection logic lives in the constructors, emission
//! in the renderers. Nothing here touches the filesystem.

pub mod api_route;
pub mod auth_client;
pub mod auth_instance;
pub mod config_snapshot;
pub mod env;
pub mod protected_routes;
pub mod route_guard;

/// Present in every generated file. Revert only deletes generator-owned
/// files that still carry it.
pub const GENERATED_MARKER: &str = "Generated by StackPatch";

/// Leading comment for generated TypeScript files.
pub(crate) fn ts_header() -> String {
    format!("// {GENERATED_MARKER}. Re-run `stackpatch add auth` to regenerate.\n")
}

pub fn is_generated(content: &str) -> bool {
    content.contains(GENERATED_MARKER)
}

/// A TypeScript string literal.
pub(crate) fn ts_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}
