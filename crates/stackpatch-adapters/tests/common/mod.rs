//! Fixtures shared by the service integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockall::mock;
use serde_json::json;
use stackpatch_adapters::MemoryFilesystem;
use stackpatch_core::{
    application::{
        InstallRequest, PatchInstaller,
        ports::{ConfigCollector, DependencyInstaller, Filesystem},
    },
    domain::{
        AuthConfig, DatabaseKind, OAuthProvider, OrmKind, PackageManager, PatchName, ProjectScan,
        SessionMode,
    },
    error::StackPatchResult,
};

pub const PROJECT: &str = "/work/app";
pub const BOILERPLATE: &str = "/opt/stackpatch/boilerplate";

pub const LAYOUT: &str = r#"import type { Metadata } from "next";
import "./globals.css";

export const metadata: Metadata = {
  title: "My App",
};

export default function RootLayout({
  children,
}: Readonly<{
  children: React.ReactNode;
}>) {
  return (
    <html lang="en">
      <body>
        {children}
      </body>
    </html>
  );
}
"#;

mock! {
    pub Installer {}

    impl DependencyInstaller for Installer {
        fn install(
            &self,
            target: &Path,
            packages: &[String],
            package_manager: PackageManager,
        ) -> StackPatchResult<()>;
    }
}

/// Hands out a fixed configuration, or cancels with `None`.
pub struct FixedCollector(pub Option<AuthConfig>);

impl ConfigCollector for FixedCollector {
    fn collect(&self, _scan: &ProjectScan) -> StackPatchResult<Option<AuthConfig>> {
        Ok(self.0.clone())
    }
}

pub fn project() -> PathBuf {
    PathBuf::from(PROJECT)
}

pub fn package_json(next: &str) -> String {
    let package = json!({
        "name": "app",
        "version": "0.1.0",
        "private": true,
        "scripts": { "dev": "next dev", "build": "next build" },
        "dependencies": {
            "next": next,
            "react": "19.0.0",
            "react-dom": "19.0.0"
        },
        "devDependencies": {
            "typescript": "^5"
        }
    });
    let mut out = serde_json::to_string_pretty(&package).unwrap();
    out.push('\n');
    out
}

/// A fresh app-router project without `src/`, plus the auth boilerplate.
pub fn seeded_fs(next: &str) -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    let root = project();
    fs.add_file(root.join("package.json"), package_json(next));
    fs.add_file(root.join("package-lock.json"), "{}\n");
    fs.add_file(
        root.join("tsconfig.json"),
        "{\n  // generated by create-next-app\n  \"compilerOptions\": {\n    \"strict\": true,\n    \"paths\": { \"@/*\": [\"./*\"] },\n  }\n}\n",
    );
    fs.add_file(root.join("app/layout.tsx"), LAYOUT);
    fs.add_file(root.join("app/page.tsx"), "export default function Home() { return <h1>Home</h1>; }\n");
    fs.add_file(root.join("app/globals.css"), "body { margin: 0; }\n");
    seed_boilerplate(&fs);
    fs
}

pub fn seed_boilerplate(fs: &MemoryFilesystem) {
    let bp = Path::new(BOILERPLATE).join("auth");
    fs.add_file(
        bp.join("app/auth/login/page.tsx"),
        "import { AuthForm } from \"@/components/auth/auth-form\";\nexport default function LoginPage() { return <AuthForm mode=\"login\" />; }\n",
    );
    fs.add_file(
        bp.join("app/auth/signup/page.tsx"),
        "import { AuthForm } from \"@/components/auth/auth-form\";\nexport default function SignupPage() { return <AuthForm mode=\"signup\" />; }\n",
    );
    fs.add_file(
        bp.join("app/stackpatch/page.tsx"),
        "import { useSession } from \"@/lib/auth-client\";\nexport default function Page() { return null; }\n",
    );
    fs.add_file(
        bp.join("components/auth/auth-wrapper.tsx"),
        "import { isProtectedRoute } from \"@/lib/protected-routes\";\nexport function AuthWrapper({ children }) { return children; }\n",
    );
    fs.add_file(
        bp.join("components/auth/auth-form.tsx"),
        "import { signIn } from \"@/lib/auth-client\";\nexport function AuthForm() { return null; }\n",
    );
    fs.add_file(
        bp.join("components/toaster.tsx"),
        "export function Toaster() { return null; }\n",
    );
}

/// Stateless, email/password, GitHub, UI, protecting `/` and `/stackpatch`.
pub fn scenario_config() -> AuthConfig {
    AuthConfig {
        session_mode: SessionMode::Stateless,
        database: DatabaseKind::Postgres,
        orm: OrmKind::Drizzle,
        email_password: true,
        oauth_providers: vec![OAuthProvider::Github],
        add_ui: true,
        protected_routes: vec!["/".into(), "/stackpatch".into()],
    }
}

pub fn request() -> InstallRequest {
    InstallRequest {
        target: project(),
        patch: PatchName::Auth,
        boilerplate_dir: PathBuf::from(BOILERPLATE),
        skip_dependencies: false,
        package_manager: None,
    }
}

/// An installer that records the packages in `package.json`, the way a
/// real package manager would.
pub fn recording_installer(fs: &MemoryFilesystem) -> MockInstaller {
    let fs = fs.clone();
    let mut installer = MockInstaller::new();
    installer
        .expect_install()
        .returning(move |target, packages, _| {
            let path = target.join("package.json");
            let mut package: serde_json::Value =
                serde_json::from_str(&fs.read_to_string(&path)?).unwrap();
            for name in packages {
                package["dependencies"][name.as_str()] = json!("^1.0.0");
            }
            let mut out = serde_json::to_string_pretty(&package).unwrap();
            out.push('\n');
            fs.write_file(&path, &out)
        });
    installer
}

pub fn patch_installer(fs: &MemoryFilesystem, installer: MockInstaller) -> PatchInstaller {
    let shared: Arc<dyn Filesystem> = Arc::new(fs.clone());
    PatchInstaller::new(shared, Box::new(installer))
}

pub fn read(fs: &MemoryFilesystem, rel: &str) -> String {
    fs.read_file(project().join(rel))
        .unwrap_or_else(|| panic!("{rel} should exist"))
}
