//! Protected route patterns.
//!
//! A pattern is either `/` (the landing page only), `/x/*` (`/x` and
//! everything below it) or a bare `/x`, which also covers everything below
//! it. The Rust matcher here, the generated `isProtectedRoute` helper and the
//! route-guard `matcher` list all implement the same rule.

use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

/// Login and signup pages, always routed through the guard so signed-in
/// users get redirected away from them.
pub const AUTH_PAGES: &[&str] = &["/auth/login", "/auth/signup"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoutePattern(String);

impl RoutePattern {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let route = raw.trim();
        if !route.starts_with('/') {
            return Err(DomainError::InvalidRoute {
                route: route.into(),
                reason: "must start with '/'".into(),
            });
        }
        if route.contains(char::is_whitespace) {
            return Err(DomainError::InvalidRoute {
                route: route.into(),
                reason: "must not contain whitespace".into(),
            });
        }
        if route.strip_suffix("/*").unwrap_or(route).contains('*') {
            return Err(DomainError::InvalidRoute {
                route: route.into(),
                reason: "'*' is only allowed as a trailing '/*'".into(),
            });
        }
        Ok(Self(route.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.ends_with("/*")
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The route without its `/*` suffix or trailing slash.
    pub fn base(&self) -> &str {
        let base = self.0.strip_suffix("/*").unwrap_or(&self.0);
        if base.len() > 1 {
            base.trim_end_matches('/')
        } else {
            base
        }
    }

    pub fn matches(&self, pathname: &str) -> bool {
        if self.is_root() {
            return pathname == "/";
        }
        let base = self.base();
        if base.is_empty() {
            // "/*" protects the whole site.
            return true;
        }
        pathname == base
            || pathname
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Next.js `config.matcher` entry for this route.
    pub fn to_matcher(&self) -> String {
        if self.is_root() {
            return "/".into();
        }
        format!("{}/:path*", self.base())
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Matcher list for the route guard: one entry per protected route plus
/// the auth pages, deduplicated in first-seen order.
pub fn guard_matchers(routes: &[RoutePattern]) -> Vec<String> {
    let mut matchers: Vec<String> = Vec::new();
    let candidates = routes
        .iter()
        .map(RoutePattern::to_matcher)
        .chain(AUTH_PAGES.iter().map(|p| (*p).to_string()));
    for matcher in candidates {
        if !matchers.contains(&matcher) {
            matchers.push(matcher);
        }
    }
    matchers
}

/// Whether `pathname` is covered by any pattern.
pub fn is_protected(routes: &[RoutePattern], pathname: &str) -> bool {
    routes.iter().any(|r| r.matches(pathname))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(s: &str) -> RoutePattern {
        RoutePattern::parse(s).unwrap()
    }

    #[test]
    fn bare_route_covers_descendants_only_on_boundary() {
        let r = route("/dashboard");
        assert!(r.matches("/dashboard"));
        assert!(r.matches("/dashboard/x"));
        assert!(!r.matches("/dashboard2"));
    }

    #[test]
    fn wildcard_route_covers_base_and_descendants() {
        let r = route("/admin/*");
        assert!(r.matches("/admin"));
        assert!(r.matches("/admin/settings"));
        assert!(!r.matches("/administrator"));
    }

    #[test]
    fn root_is_exact() {
        let r = route("/");
        assert!(r.matches("/"));
        assert!(!r.matches("/about"));
    }

    #[test]
    fn matcher_list_for_landing_and_section() {
        let routes = vec![route("/"), route("/stackpatch")];
        assert_eq!(
            guard_matchers(&routes),
            vec!["/", "/stackpatch/:path*", "/auth/login", "/auth/signup"]
        );
    }

    #[test]
    fn wildcard_and_bare_produce_same_matcher() {
        let routes = vec![route("/admin/*"), route("/admin")];
        assert_eq!(
            guard_matchers(&routes),
            vec!["/admin/:path*", "/auth/login", "/auth/signup"]
        );
    }

    #[test]
    fn parse_rejects_bad_routes() {
        assert!(RoutePattern::parse("dashboard").is_err());
        assert!(RoutePattern::parse("/a b").is_err());
        assert!(RoutePattern::parse("/a/*/b").is_err());
        assert!(RoutePattern::parse("/a/*").is_ok());
    }

    #[test]
    fn trailing_slash_is_ignored_for_matching() {
        let r = route("/docs/");
        assert!(r.matches("/docs"));
        assert!(r.matches("/docs/intro"));
        assert_eq!(r.to_matcher(), "/docs/:path*");
    }

    #[test]
    fn any_protected() {
        let routes = vec![route("/dashboard"), route("/admin/*")];
        assert!(is_protected(&routes, "/admin/users"));
        assert!(!is_protected(&routes, "/"));
    }
}
