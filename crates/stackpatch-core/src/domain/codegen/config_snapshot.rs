//! `stackpatch.config.json`: the final configuration, for tooling and re-runs.

use serde::{Deserialize, Serialize};

use super::GENERATED_MARKER;
use crate::domain::{AuthConfig, value_objects::PatchName};

pub const CONFIG_SNAPSHOT_FILE: &str = "stackpatch.config.json";
pub const CONFIG_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(rename = "_comment")]
    pub comment: String,
    pub version: u32,
    pub patch: PatchName,
    pub generated_at: String,
    pub auth: AuthConfig,
}

impl ConfigSnapshot {
    pub fn new(patch: PatchName, config: &AuthConfig, generated_at: impl Into<String>) -> Self {
        Self {
            comment: format!("{GENERATED_MARKER}. Safe to delete."),
            version: CONFIG_SNAPSHOT_VERSION,
            patch,
            generated_at: generated_at.into(),
            auth: config.normalized(),
        }
    }
}

pub fn render(snapshot: &ConfigSnapshot) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(snapshot)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DatabaseKind, SessionMode};

    #[test]
    fn snapshot_stores_normalized_config() {
        let config = AuthConfig {
            session_mode: SessionMode::Stateless,
            ..AuthConfig::default()
        };
        let snapshot = ConfigSnapshot::new(PatchName::Auth, &config, "2025-01-01T00:00:00Z");
        assert_eq!(snapshot.auth.database, DatabaseKind::None);

        let json = render(&snapshot).unwrap();
        assert!(json.contains(GENERATED_MARKER));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["patch"], "auth");
        assert_eq!(value["auth"]["orm"], "none");
        assert_eq!(value["generatedAt"], "2025-01-01T00:00:00Z");
    }
}
