//! `proxy.ts` / `middleware.ts`: redirects at the network boundary.
//!
//! Next.js 16 renamed middleware to proxy. One major version decides the
//! file name and export style; an unknown version is treated as current.

use super::{ts_header, ts_string};
use crate::domain::{
    AuthConfig,
    routes::{AUTH_PAGES, guard_matchers},
};

/// First Next.js major that expects `proxy.ts`.
pub const PROXY_MIN_MAJOR: u64 = 16;

/// Paths the guard always lets through, so a site-wide matcher cannot
/// block the auth endpoints or framework assets.
pub const PUBLIC_PATHS: &[&str] = &["/api/auth", "/_next", "/favicon.ico"];

/// Substrings that mark a guard file as already doing auth.
pub const AUTH_LOGIC_MARKERS: &[&str] = &[
    "better-auth",
    "getSessionCookie",
    "auth.api.getSession",
    "next-auth",
    "withAuth",
    "clerkMiddleware",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardConvention {
    /// `proxy.ts` with `export function proxy`
    Proxy,
    /// `middleware.ts` with `export default function middleware`
    Middleware,
}

impl GuardConvention {
    pub fn for_next_major(major: Option<u64>) -> Self {
        match major {
            Some(major) if major < PROXY_MIN_MAJOR => Self::Middleware,
            _ => Self::Proxy,
        }
    }

    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Proxy => "proxy.ts",
            Self::Middleware => "middleware.ts",
        }
    }

    pub const fn other(&self) -> Self {
        match self {
            Self::Proxy => Self::Middleware,
            Self::Middleware => Self::Proxy,
        }
    }

    fn signature(&self) -> &'static str {
        match self {
            Self::Proxy => "export function proxy(request: NextRequest)",
            Self::Middleware => "export default function middleware(request: NextRequest)",
        }
    }
}

pub fn has_auth_logic(source: &str) -> bool {
    AUTH_LOGIC_MARKERS.iter().any(|m| source.contains(m))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardOptions {
    pub convention: GuardConvention,
    pub matchers: Vec<String>,
}

impl RouteGuardOptions {
    /// `None` when no route is protected.
    pub fn new(config: &AuthConfig, next_major: Option<u64>) -> Option<Self> {
        let routes = config.route_patterns();
        if routes.is_empty() {
            return None;
        }
        Some(Self {
            convention: GuardConvention::for_next_major(next_major),
            matchers: guard_matchers(&routes),
        })
    }
}

pub fn render(options: &RouteGuardOptions) -> String {
    let auth_pages = AUTH_PAGES
        .iter()
        .map(|p| ts_string(p))
        .collect::<Vec<_>>()
        .join(", ");
    let public_paths = PUBLIC_PATHS
        .iter()
        .map(|p| ts_string(p))
        .collect::<Vec<_>>()
        .join(", ");
    let matchers = options
        .matchers
        .iter()
        .map(|m| ts_string(m))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = ts_header();
    out.push_str(&format!(
        r#"import {{ NextRequest, NextResponse }} from "next/server";
import {{ getSessionCookie }} from "better-auth/cookies";

const AUTH_PAGES = [{auth_pages}];
const PUBLIC_PATHS = [{public_paths}];

{signature} {{
  const {{ pathname }} = request.nextUrl;
  const isPublic = PUBLIC_PATHS.some(
    (path) => pathname === path || pathname.startsWith(`${{path}}/`),
  );
  if (isPublic) {{
    return NextResponse.next();
  }}

  const sessionCookie = getSessionCookie(request);
  const isAuthPage = AUTH_PAGES.includes(pathname);

  if (sessionCookie && isAuthPage) {{
    return NextResponse.redirect(new URL("/", request.url));
  }}

  if (!sessionCookie && !isAuthPage) {{
    const loginUrl = new URL("/auth/login", request.url);
    loginUrl.searchParams.set("redirect", pathname);
    return NextResponse.redirect(loginUrl);
  }}

  return NextResponse.next();
}}

export const config = {{
  matcher: [{matchers}],
}};
"#,
        signature = options.convention.signature(),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(routes: &[&str]) -> AuthConfig {
        AuthConfig {
            protected_routes: routes.iter().map(|r| r.to_string()).collect(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn no_routes_no_guard() {
        assert_eq!(RouteGuardOptions::new(&config_with(&[]), Some(16)), None);
    }

    #[test]
    fn convention_by_major() {
        assert_eq!(GuardConvention::for_next_major(Some(15)), GuardConvention::Middleware);
        assert_eq!(GuardConvention::for_next_major(Some(16)), GuardConvention::Proxy);
        assert_eq!(GuardConvention::for_next_major(None), GuardConvention::Proxy);
        assert_eq!(GuardConvention::Proxy.other().file_name(), "middleware.ts");
    }

    #[test]
    fn middleware_uses_default_export() {
        let options = RouteGuardOptions::new(&config_with(&["/"]), Some(14)).unwrap();
        let out = render(&options);
        assert!(out.contains("export default function middleware("));
        assert!(!out.contains("export function proxy("));
    }

    #[test]
    fn proxy_uses_named_export_and_matchers() {
        let options =
            RouteGuardOptions::new(&config_with(&["/", "/stackpatch"]), Some(16)).unwrap();
        let out = render(&options);
        assert!(out.contains("export function proxy(request: NextRequest)"));
        assert!(out.contains(
            r#"matcher: ["/", "/stackpatch/:path*", "/auth/login", "/auth/signup"]"#
        ));
        assert!(has_auth_logic(&out));
    }

    #[test]
    fn site_wide_guard_lets_auth_endpoints_through() {
        let options = RouteGuardOptions::new(&config_with(&["/*"]), Some(16)).unwrap();
        assert_eq!(options.matchers[0], "/:path*");

        let out = render(&options);
        assert!(out.contains(r#"const PUBLIC_PATHS = ["/api/auth", "/_next", "/favicon.ico"];"#));
        let pass_through = out.find("if (isPublic)").unwrap();
        let redirect = out.find("NextResponse.redirect(loginUrl)").unwrap();
        assert!(pass_through < redirect);
    }

    #[test]
    fn plain_middleware_has_no_auth_logic() {
        let src = "export function middleware() { return NextResponse.next(); }";
        assert!(!has_auth_logic(src));
    }
}
