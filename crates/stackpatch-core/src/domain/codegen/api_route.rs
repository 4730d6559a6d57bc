//! The catch-all auth handler: `app/api/auth/[...all]/route.ts` for the app
//! router, `pages/api/auth/[...all].ts` for the pages router.

use super::ts_header;
use crate::domain::ProjectLayout;

pub struct ApiRouteOptions {
    /// Project-relative path of the route file.
    pub path: String,
    /// How the route imports the auth instance.
    pub auth_import: String,
    pub pages_router: bool,
}

impl ApiRouteOptions {
    pub fn new(layout: &ProjectLayout) -> Self {
        let pages_router = layout.uses_pages_router();
        let path = if pages_router {
            format!("{}/api/auth/[...all].ts", layout.app_dir)
        } else {
            format!("{}/api/auth/[...all]/route.ts", layout.app_dir)
        };
        let auth_import = layout.lib_import_path("auth", &path);
        Self {
            path,
            auth_import,
            pages_router,
        }
    }
}

pub fn render(options: &ApiRouteOptions) -> String {
    let mut out = ts_header();
    if options.pages_router {
        out.push_str(&format!(
            "import {{ auth }} from \"{}\";\nimport {{ toNodeHandler }} from \"better-auth/node\";\n\nexport const config = {{ api: {{ bodyParser: false }} }};\n\nexport default toNodeHandler(auth.handler);\n",
            options.auth_import
        ));
        return out;
    }
    out.push_str(&format!(
        "import {{ auth }} from \"{}\";\nimport {{ toNextJsHandler }} from \"better-auth/next-js\";\n\nexport const {{ GET, POST }} = toNextJsHandler(auth);\n",
        options.auth_import
    ));
    out
}
