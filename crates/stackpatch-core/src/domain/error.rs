// ============================================================================
// domain/error.rs - PATCH DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Unknown patch '{name}'")]
    UnknownPatch { name: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid protected route '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("ORM '{orm}' cannot be used with database '{database}'")]
    IncompatibleOrm { orm: String, database: String },

    // ========================================================================
    // Source edits
    // ========================================================================
    #[error("Cannot place <{component}> in {file}: no {{children}} expression or <body> block")]
    LayoutAnchorMissing { component: String, file: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownPatch { name } => vec![
                format!("'{name}' is not a known patch"),
                "Available patches:".into(),
                "  • auth  - Better Auth with login/signup pages and route protection".into(),
                "Example: stackpatch add auth".into(),
            ],
            Self::InvalidValue { field, value } => vec![
                format!("'{value}' is not accepted for {field}"),
                "Use --help to list accepted values".into(),
            ],
            Self::InvalidRoute { route, .. } => vec![
                format!("Check the route '{route}'"),
                "Routes must start with '/', e.g. /dashboard or /admin/*".into(),
            ],
            Self::IncompatibleOrm { database, .. } => vec![
                format!("Pick a different ORM for {database}"),
                "MongoDB works with --orm prisma or --orm raw".into(),
            ],
            Self::LayoutAnchorMissing { file, .. } => vec![
                format!("Open {file} and make sure it renders {{children}} inside <body>"),
                "Or re-run with --no-ui to skip layout changes".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownPatch { .. } | Self::InvalidValue { .. } | Self::InvalidRoute { .. } => {
                ErrorCategory::Validation
            }
            Self::IncompatibleOrm { .. } => ErrorCategory::Compatibility,
            Self::LayoutAnchorMissing { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Internal,
}
