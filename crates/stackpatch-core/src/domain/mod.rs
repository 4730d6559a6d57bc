// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for StackPatch.
//!
//! This module contains pure patch logic: value objects, the auth
//! configuration and its invariants, the manifest schema, route matching,
//! layout text edits and the per-file source renderers.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process or network calls; everything that
//!   touches a project goes through the ports in `crate::application`
//! - **Immutable values**: All domain objects are Clone + PartialEq
//!
// Public API - what the world sees
pub mod codegen;
pub mod entities;
pub mod error;
pub mod layout_edit;
pub mod routes;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    AuthConfig, ImportAlias, MANIFEST_VERSION, ManifestFiles, ModifiedFile, ProjectLayout,
    ProjectScan, StackPatchManifest,
};

pub use error::{DomainError, ErrorCategory};

pub use layout_edit::{LayoutEdit, Placement};
pub use routes::RoutePattern;

pub use value_objects::{
    DatabaseKind, ExistingAuth, FrameworkKind, OAuthProvider, OrmKind, PackageManager, PatchName,
    RouterKind, Runtime, SessionMode,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codegen::{auth_instance, route_guard};

    /// The scenario from the auth patch docs, rendered without a filesystem.
    #[test]
    fn stateless_github_scenario_renders_expected_sources() {
        let config = AuthConfig {
            session_mode: SessionMode::Stateless,
            database: DatabaseKind::Postgres,
            orm: OrmKind::Drizzle,
            email_password: true,
            oauth_providers: vec![OAuthProvider::Github],
            add_ui: true,
            protected_routes: vec!["/".into(), "/stackpatch".into()],
        };
        config.validate().unwrap();

        let instance = auth_instance::render(&auth_instance::AuthInstanceOptions::new(&config));
        assert!(instance.contains("socialProviders"));
        assert!(instance.contains("github: {"));
        assert!(!auth_instance::has_database_import(&instance));

        let guard = route_guard::RouteGuardOptions::new(&config, Some(15)).unwrap();
        assert_eq!(guard.convention.file_name(), "middleware.ts");
        assert_eq!(
            guard.matchers,
            vec!["/", "/stackpatch/:path*", "/auth/login", "/auth/signup"]
        );
    }

    #[test]
    fn value_objects_parse_from_cli_strings() {
        use std::str::FromStr;
        assert_eq!(SessionMode::from_str("stateless").unwrap(), SessionMode::Stateless);
        assert_eq!(OrmKind::from_str("prisma").unwrap(), OrmKind::Prisma);
        assert_eq!(PackageManager::from_str("bun").unwrap(), PackageManager::Bun);
    }
}
