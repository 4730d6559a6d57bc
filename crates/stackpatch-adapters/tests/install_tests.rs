//! Patch installation against an in-memory project.

mod common;

use common::*;
use stackpatch_adapters::StaticConflictResolver;
use stackpatch_core::{
    application::ApplicationError,
    domain::{
        AuthConfig, PackageManager,
        codegen::{GENERATED_MARKER, auth_instance::has_database_import},
    },
    error::StackPatchError,
};

#[test]
fn scenario_install_produces_expected_files_and_manifest() {
    let fs = seeded_fs("15.1.0");
    let installer = patch_installer(&fs, recording_installer(&fs));

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    let auth = read(&fs, "lib/auth.ts");
    assert!(auth.contains("socialProviders"));
    assert!(auth.contains("github: {"));
    assert!(!has_database_import(&auth));
    assert!(auth.contains(GENERATED_MARKER));

    assert!(read(&fs, "lib/auth-client.ts").contains("createAuthClient"));
    assert!(read(&fs, "app/api/auth/[...all]/route.ts").contains("from \"@/lib/auth\""));

    let guard = read(&fs, "middleware.ts");
    assert!(guard.contains(r#"["/", "/stackpatch/:path*", "/auth/login", "/auth/signup"]"#));
    assert_eq!(outcome.route_guard.as_deref(), Some("middleware.ts"));

    let example = read(&fs, ".env.example");
    assert!(example.contains("GITHUB_CLIENT_ID="));
    assert!(example.contains("GITHUB_CLIENT_SECRET="));

    let files = &outcome.manifest.files;
    for path in [
        "lib/auth.ts",
        "lib/auth-client.ts",
        "app/api/auth/[...all]/route.ts",
        "middleware.ts",
        ".env.example",
        "app/auth/login/page.tsx",
        "components/auth/auth-wrapper.tsx",
    ] {
        assert!(files.added.iter().any(|p| p == path), "{path} missing from added");
    }
    assert!(!files.added.iter().any(|p| p == "app/layout.tsx"));
    assert_eq!(files.modified.len(), 1);
    assert_eq!(files.modified[0].path, "app/layout.tsx");
    assert_eq!(files.modified[0].original_content, LAYOUT);
    assert_eq!(files.backed_up, vec![".stackpatch/backups/app_layout.tsx"]);
    assert_eq!(outcome.manifest.oauth_providers, vec!["github"]);

    let on_disk: serde_json::Value =
        serde_json::from_str(&read(&fs, ".stackpatch/manifest.json")).unwrap();
    assert_eq!(on_disk["patchName"], "auth");
    assert_eq!(on_disk["files"]["modified"][0]["originalContent"], LAYOUT);
}

#[test]
fn layout_gets_wrapper_and_toaster_once() {
    let fs = seeded_fs("15.1.0");
    let installer = patch_installer(&fs, recording_installer(&fs));
    let collector = FixedCollector(Some(scenario_config()));

    installer
        .install(&request(), &collector, &StaticConflictResolver::never())
        .unwrap();
    let layout = read(&fs, "app/layout.tsx");
    assert!(layout.contains("<AuthWrapper>{children}</AuthWrapper>"));
    assert!(layout.contains("<Toaster />"));
    assert!(layout.contains("import { AuthWrapper } from \"@/components/auth/auth-wrapper\";"));

    // A second run changes nothing in the layout and keeps the pristine original.
    let outcome = installer
        .install(&request(), &collector, &StaticConflictResolver::never())
        .unwrap();
    assert_eq!(read(&fs, "app/layout.tsx"), layout);
    assert_eq!(layout.matches("<Toaster />").count(), 1);
    assert_eq!(outcome.manifest.files.modified[0].original_content, LAYOUT);
}

#[test]
fn boilerplate_imports_are_rewritten_without_alias() {
    let fs = seeded_fs("15.1.0");
    fs.add_file(project().join("tsconfig.json"), "{ \"compilerOptions\": {} }\n");
    let installer = patch_installer(&fs, recording_installer(&fs));

    installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    let login = read(&fs, "app/auth/login/page.tsx");
    assert!(login.contains("from \"../../../components/auth/auth-form\""));
    let layout = read(&fs, "app/layout.tsx");
    assert!(layout.contains("from \"../components/auth/auth-wrapper\""));
}

#[test]
fn next_16_gets_proxy_convention() {
    let fs = seeded_fs("^16.0.0");
    let installer = patch_installer(&fs, recording_installer(&fs));

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    assert_eq!(outcome.route_guard.as_deref(), Some("proxy.ts"));
    assert!(read(&fs, "proxy.ts").contains("export function proxy("));
    assert!(fs.read_file(project().join("middleware.ts")).is_none());
}

#[test]
fn upgrade_replaces_stale_guard_convention() {
    let fs = seeded_fs("15.1.0");
    let installer = patch_installer(&fs, recording_installer(&fs));
    let collector = FixedCollector(Some(scenario_config()));
    installer
        .install(&request(), &collector, &StaticConflictResolver::never())
        .unwrap();
    assert!(fs.read_file(project().join("middleware.ts")).is_some());

    fs.add_file(project().join("package.json"), package_json("16.0.1"));
    let outcome = installer
        .install(&request(), &collector, &StaticConflictResolver::never())
        .unwrap();

    assert!(fs.read_file(project().join("middleware.ts")).is_none());
    assert!(fs.read_file(project().join("proxy.ts")).is_some());
    let added = &outcome.manifest.files.added;
    assert!(added.iter().any(|p| p == "proxy.ts"));
    assert!(!added.iter().any(|p| p == "middleware.ts"));
}

#[test]
fn existing_auth_guard_is_left_alone() {
    let fs = seeded_fs("15.1.0");
    let custom = "import { clerkMiddleware } from \"@clerk/nextjs/server\";\nexport default clerkMiddleware();\n";
    fs.add_file(project().join("middleware.ts"), custom);
    let installer = patch_installer(&fs, recording_installer(&fs));

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    assert_eq!(read(&fs, "middleware.ts"), custom);
    assert_eq!(outcome.route_guard, None);
    assert!(outcome.warnings.iter().any(|w| w.contains("middleware.ts")));
    assert!(!outcome.manifest.files.added.iter().any(|p| p == "middleware.ts"));
}

#[test]
fn declined_conflict_leaves_project_untouched() {
    let fs = seeded_fs("15.1.0");
    fs.add_file(project().join("app/auth/login/page.tsx"), "export default function Mine() {}\n");
    let before = fs.snapshot(project());

    let mut mock = MockInstaller::new();
    mock.expect_install().never();
    let installer = patch_installer(&fs, mock);

    let err = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap_err();

    match err {
        StackPatchError::Application(ApplicationError::ConflictDeclined { conflicts }) => {
            assert_eq!(conflicts, vec!["app/auth/login/page.tsx"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs.snapshot(project()), before);
}

#[test]
fn accepted_conflict_is_recorded_as_modified() {
    let fs = seeded_fs("15.1.0");
    let mine = "export default function Mine() {}\n";
    fs.add_file(project().join("app/auth/login/page.tsx"), mine);
    let installer = patch_installer(&fs, recording_installer(&fs));

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::always(),
        )
        .unwrap();

    let files = &outcome.manifest.files;
    assert!(!files.added.iter().any(|p| p == "app/auth/login/page.tsx"));
    let entry = files
        .modified
        .iter()
        .find(|m| m.path == "app/auth/login/page.tsx")
        .unwrap();
    assert_eq!(entry.original_content, mine);
}

#[test]
fn cancelled_collection_writes_nothing() {
    let fs = seeded_fs("15.1.0");
    let before = fs.snapshot(project());
    let installer = patch_installer(&fs, MockInstaller::new());

    let err = installer
        .install(&request(), &FixedCollector(None), &StaticConflictResolver::never())
        .unwrap_err();

    assert!(err.is_declined());
    assert_eq!(fs.snapshot(project()), before);
}

#[test]
fn missing_package_json_is_rejected() {
    let fs = seeded_fs("15.1.0");
    stackpatch_core::application::ports::Filesystem::remove_file(
        &fs,
        &project().join("package.json"),
    )
    .unwrap();
    let installer = patch_installer(&fs, MockInstaller::new());

    let err = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StackPatchError::Application(ApplicationError::NotAProject { .. })
    ));
}

#[test]
fn install_failure_reports_manual_command_and_still_commits() {
    let fs = seeded_fs("15.1.0");
    let mut mock = MockInstaller::new();
    mock.expect_install()
        .withf(|_, packages, pm| {
            packages.iter().any(|p| p == "better-auth") && *pm == PackageManager::Npm
        })
        .times(1)
        .returning(|_, _, _| {
            Err(ApplicationError::ExternalCommand {
                command: "npm install better-auth".into(),
                reason: "exited with status 1".into(),
            }
            .into())
        });
    let installer = patch_installer(&fs, mock);

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    assert!(!outcome.dependencies_installed);
    assert_eq!(
        outcome.manual_install_command.as_deref(),
        Some("npm install better-auth sonner")
    );
    assert_eq!(outcome.manifest.dependencies, vec!["better-auth", "sonner"]);
    assert!(fs.read_file(project().join(".stackpatch/manifest.json")).is_some());
}

#[test]
fn without_ui_nothing_is_copied_and_layout_is_untouched() {
    let fs = seeded_fs("15.1.0");
    let installer = patch_installer(&fs, recording_installer(&fs));
    let config = AuthConfig {
        add_ui: false,
        protected_routes: Vec::new(),
        ..scenario_config()
    };

    let outcome = installer
        .install(&request(), &FixedCollector(Some(config)), &StaticConflictResolver::never())
        .unwrap();

    assert_eq!(read(&fs, "app/layout.tsx"), LAYOUT);
    assert!(fs.read_file(project().join("app/auth/login/page.tsx")).is_none());
    assert!(fs.read_file(project().join("lib/protected-routes.ts")).is_none());
    assert!(outcome.manifest.files.modified.is_empty());
    assert_eq!(outcome.route_guard, None);
}

#[test]
fn existing_env_local_is_not_overwritten() {
    let fs = seeded_fs("15.1.0");
    fs.add_file(project().join(".env.local"), "MY_SECRET=1\n");
    let installer = patch_installer(&fs, recording_installer(&fs));

    let outcome = installer
        .install(
            &request(),
            &FixedCollector(Some(scenario_config())),
            &StaticConflictResolver::never(),
        )
        .unwrap();

    assert_eq!(read(&fs, ".env.local"), "MY_SECRET=1\n");
    let env_files = outcome.manifest.files.env_files.unwrap();
    assert_eq!(env_files, vec![".env.example"]);
}
