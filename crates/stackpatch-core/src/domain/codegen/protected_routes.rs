//! `lib/protected-routes.ts`: route list plus `isProtectedRoute`, used by
//! the auth wrapper for render-time gating.

use super::{ts_header, ts_string};
use crate::domain::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutesOptions {
    pub routes: Vec<String>,
}

impl ProtectedRoutesOptions {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            routes: config
                .route_patterns()
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
    }
}

pub fn render(options: &ProtectedRoutesOptions) -> String {
    let routes = options
        .routes
        .iter()
        .map(|r| ts_string(r))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = ts_header();
    out.push_str(&format!(
        r#"export const protectedRoutes: string[] = [{routes}];

export function isProtectedRoute(pathname: string): boolean {{
  return protectedRoutes.some((route) => {{
    if (route === "/") {{
      return pathname === "/";
    }}
    const stripped = route.endsWith("/*") ? route.slice(0, -2) : route;
    const base = stripped.length > 1 ? stripped.replace(/\/+$/, "") : stripped;
    if (base === "") {{
      return true;
    }}
    return pathname === base || pathname.startsWith(`${{base}}/`);
  }});
}}
"#
    ));
    out
}
