//! Domain entities: project facts, auth configuration, manifest and layout.

pub mod auth_config;
pub mod layout;
pub mod manifest;
pub mod project_scan;

pub use auth_config::AuthConfig;
pub use layout::{ImportAlias, ProjectLayout};
pub use manifest::{MANIFEST_VERSION, ManifestFiles, ModifiedFile, StackPatchManifest};
pub use project_scan::ProjectScan;
