//! The configuration an auth installation is generated from.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    routes::RoutePattern,
    value_objects::{DatabaseKind, OAuthProvider, OrmKind, SessionMode},
};

/// Choices made by the configuration collector.
///
/// Values may arrive contradictory (a stateless session with a database
/// selected). Renderers never read this struct directly; they go through
/// [`AuthConfig::normalized`] via their options constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub session_mode: SessionMode,
    pub database: DatabaseKind,
    pub orm: OrmKind,
    pub email_password: bool,
    #[serde(default)]
    pub oauth_providers: Vec<OAuthProvider>,
    #[serde(rename = "addUI")]
    pub add_ui: bool,
    #[serde(default)]
    pub protected_routes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_mode: SessionMode::Database,
            database: DatabaseKind::Postgres,
            orm: OrmKind::Drizzle,
            email_password: true,
            oauth_providers: Vec::new(),
            add_ui: true,
            protected_routes: Vec::new(),
        }
    }
}

impl AuthConfig {
    pub fn is_stateless(&self) -> bool {
        self.session_mode == SessionMode::Stateless
    }

    /// Copy with every invariant applied.
    ///
    /// - stateless sessions force `database` and `orm` to `none`
    /// - providers are deduplicated, first occurrence wins
    /// - routes are trimmed, empty entries dropped, duplicates removed
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        if config.is_stateless() {
            config.database = DatabaseKind::None;
            config.orm = OrmKind::None;
        }

        let mut providers = Vec::with_capacity(config.oauth_providers.len());
        for provider in &config.oauth_providers {
            if !providers.contains(provider) {
                providers.push(*provider);
            }
        }
        config.oauth_providers = providers;

        let mut routes: Vec<String> = Vec::with_capacity(config.protected_routes.len());
        for route in &config.protected_routes {
            let route = route.trim();
            if !route.is_empty() && !routes.iter().any(|r| r == route) {
                routes.push(route.to_string());
            }
        }
        config.protected_routes = routes;
        config
    }

    /// True when the auth instance gets a database adapter.
    pub fn uses_database_adapter(&self) -> bool {
        let config = self.normalized();
        config.session_mode == SessionMode::Database
            && config.database != DatabaseKind::None
            && config.orm != OrmKind::None
    }

    /// Whether a `DATABASE_URL` placeholder belongs in the env template.
    pub fn needs_database_url(&self) -> bool {
        self.uses_database_adapter() && matches!(self.orm, OrmKind::Raw | OrmKind::Drizzle)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for route in &self.protected_routes {
            RoutePattern::parse(route)?;
        }

        if self.uses_database_adapter()
            && self.orm == OrmKind::Drizzle
            && self.database == DatabaseKind::Mongodb
        {
            return Err(DomainError::IncompatibleOrm {
                orm: self.orm.to_string(),
                database: self.database.to_string(),
            });
        }

        Ok(())
    }

    /// Routes parsed for matching, skipping any that fail to parse.
    pub fn route_patterns(&self) -> Vec<RoutePattern> {
        self.normalized()
            .protected_routes
            .iter()
            .filter_map(|r| RoutePattern::parse(r).ok())
            .collect()
    }
}
