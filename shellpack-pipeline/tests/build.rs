//! End-to-end builds against a scripted toolchain.

use pretty_assertions::assert_eq;
use shellpack_pipeline::{
    Build, BuildOptions, BuildOutcome, Error, NullSink, Pipeline, ReloadState, Result, StageState,
    pipeline::TimingPlugin,
    testing::{FakeRunner, Fixture, RecordingSink, read_archive},
};

const ID: &str = Fixture::ID;

fn build(fixture: &Fixture, runner: &FakeRunner) -> Result<BuildOutcome> {
    Build::new(runner, &NullSink).run(fixture.root(), BuildOptions::default())
}

fn install() -> BuildOptions {
    BuildOptions {
        install: true,
        ..BuildOptions::default()
    }
}

#[test]
fn test_plain_project_archives_source_tree() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    assert_eq!(
        outcome.artifact.archive_path,
        fixture.archive("1.0.0").canonicalize().unwrap()
    );
    assert_eq!(
        read_archive(&outcome.artifact.archive_path).unwrap(),
        vec!["extension.js", "metadata.json", "stylesheet.css"]
    );
    assert_eq!(
        outcome
            .results
            .iter()
            .map(|r| r.stage.as_str())
            .collect::<Vec<_>>(),
        vec!["package"]
    );
    assert!(!runner.ran("tsc"));
    assert!(!runner.ran("msgfmt"));
    assert_eq!(outcome.reload, ReloadState::NotRequested);
}

#[test]
fn test_license_is_archived_and_cleaned_up() {
    let fixture = Fixture::new();
    fixture.write("LICENSE", "MIT\n");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    let members = read_archive(&outcome.artifact.archive_path).unwrap();
    assert!(members.contains(&"LICENSE".to_string()));
    assert_eq!(fixture.files("src"), vec!["extension.js", "stylesheet.css"]);
}

#[test]
fn test_stale_metadata_in_output_tree_is_replaced() {
    let fixture = Fixture::new();
    fixture.write("src/metadata.json", r#"{"uuid": "clock@example.com", "version-name": "0.9.0"}"#);
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    assert_eq!(
        read_archive(&outcome.artifact.archive_path).unwrap(),
        vec!["extension.js", "metadata.json", "stylesheet.css"]
    );
    assert_eq!(
        runner.archived_file("metadata.json"),
        Some(fixture.read("metadata.json"))
    );
    assert_eq!(fixture.files("src"), vec!["extension.js", "stylesheet.css"]);
}

#[test]
fn test_version_with_build_metadata() {
    let fixture = Fixture::new();
    fixture.write(
        "package.json",
        "{\n  \"name\": \"clock\",\n  \"version\": \"1.0.0+build.5\"\n}\n",
    );
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    assert_eq!(outcome.artifact.identity.version.to_string(), "1.0.0+build.5");
    assert_eq!(
        outcome.artifact.archive_path,
        fixture.archive("1.0.0+build.5").canonicalize().unwrap()
    );
}

#[test]
fn test_archive_members_are_flat() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    let members = read_archive(&outcome.artifact.archive_path).unwrap();
    assert!(!members.is_empty());
    for member in &members {
        assert!(!member.starts_with("dist/"), "{member}");
        assert!(!member.starts_with("src/"), "{member}");
        assert!(!member.starts_with('/'), "{member}");
    }
}

#[test]
fn test_typed_project_compiles_and_copies_assets() {
    let fixture = Fixture::typed();
    fixture.write("src/icons/clock.svg", "<svg/>\n");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    assert!(runner.ran("npm"), "dependencies should be installed first");
    assert_eq!(
        fixture.files("dist"),
        vec!["extension.js", "icons/clock.svg", "prefs.js", "stylesheet.css"]
    );
    assert_eq!(
        read_archive(&outcome.artifact.archive_path).unwrap(),
        vec![
            "extension.js",
            "icons/clock.svg",
            "metadata.json",
            "prefs.js",
            "stylesheet.css"
        ]
    );
    assert!(outcome.project.output_dir.ends_with("dist"));
}

#[test]
fn test_existing_dependencies_skip_install() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();

    assert!(!runner.ran("npm"));
}

#[test]
fn test_lockfile_selects_package_manager() {
    let fixture = Fixture::typed();
    fixture.write("pnpm-lock.yaml", "lockfileVersion: '9.0'\n");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();

    assert!(runner.ran("pnpm"));
    assert!(!runner.ran("npm"));
}

#[test]
fn test_compile_clears_previous_output() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write("dist/stale.js", "old\n");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();

    assert!(!fixture.exists("dist/stale.js"));
}

#[test]
fn test_compile_is_idempotent() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();
    let first: Vec<(String, String)> = fixture
        .files("dist")
        .into_iter()
        .map(|f| {
            let content = fixture.read(&format!("dist/{f}"));
            (f, content)
        })
        .collect();

    build(&fixture, &runner).unwrap();
    let second: Vec<(String, String)> = fixture
        .files("dist")
        .into_iter()
        .map(|f| {
            let content = fixture.read(&format!("dist/{f}"));
            (f, content)
        })
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_compiler_fallback_chain() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new().without_tool("tsc");

    build(&fixture, &runner).unwrap();

    assert!(
        runner
            .command_lines()
            .iter()
            .any(|line| line.starts_with("npx tsc --outDir"))
    );
}

#[test]
fn test_local_compiler_preferred() {
    let fixture = Fixture::typed();
    fixture.write("node_modules/.bin/tsc", "#!/bin/sh\n");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();

    let compiler = runner
        .calls()
        .into_iter()
        .find(|c| c.program.ends_with("tsc"))
        .unwrap();
    assert!(compiler.program.contains("node_modules"));
}

#[test]
fn test_compiler_not_found() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new().without_tool("tsc").without_tool("npx");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("compile"));
    match err.root_cause() {
        Error::CompilerNotFound { tried } => assert_eq!(tried, "local tsc, tsc, npx tsc"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!fixture.exists(&format!("build/{ID}.shell-extension-v1.0.0.zip")));
}

#[test]
fn test_compiler_failure_is_fatal() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new().failing("tsc", 2, "src/extension.ts(1,1): error TS1005");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("compile"));
    assert!(matches!(
        err.root_cause(),
        Error::ToolExecution { exit_code: 2, .. }
    ));
}

#[test]
fn test_esbuild_when_configured() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write("esbuild.config.mjs", "// config\n");
    let runner = FakeRunner::new();

    let outcome = Build::new(&runner, &NullSink)
        .run(
            fixture.root(),
            BuildOptions {
                use_esbuild: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

    assert!(runner.ran("node"));
    assert!(!runner.ran("tsc"));
    assert!(outcome.diagnostics.is_empty());
    assert!(fixture.exists("dist/extension.js"));
}

#[test]
fn test_esbuild_from_project_config() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write("esbuild.config.mjs", "// config\n");
    fixture.write("shellpack.toml", "[build]\nuse-esbuild = true\n");
    let runner = FakeRunner::new();

    build(&fixture, &runner).unwrap();

    assert!(runner.ran("node"));
}

#[test]
fn test_missing_esbuild_config_falls_back_with_warning() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    let runner = FakeRunner::new();

    let outcome = Build::new(&runner, &NullSink)
        .run(
            fixture.root(),
            BuildOptions {
                use_esbuild: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

    assert!(!runner.ran("node"));
    assert!(runner.ran("tsc"));
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].stage, "compile");
    assert_eq!(
        outcome.diagnostics[0].location.as_deref(),
        Some("esbuild.config.mjs")
    );
}

#[test]
fn test_translations_are_compiled_per_locale() {
    let fixture = Fixture::new();
    fixture.write("po/en.po", "msgid \"\"\n");
    fixture.write("po/fr.po", "msgid \"\"\n");
    fixture.write("po/clock.pot", "msgid \"\"\n");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    let members = read_archive(&outcome.artifact.archive_path).unwrap();
    assert!(members.contains(&format!("locale/en/LC_MESSAGES/{ID}.mo")));
    assert!(members.contains(&format!("locale/fr/LC_MESSAGES/{ID}.mo")));
    assert_eq!(
        runner.calls().iter().filter(|c| c.program == "msgfmt").count(),
        2
    );
}

#[test]
fn test_missing_translation_tool_skips_stage() {
    let fixture = Fixture::new();
    fixture.write("po/de.po", "msgid \"\"\n");
    let runner = FakeRunner::new().without_tool("msgfmt");
    let sink = RecordingSink::new();

    let outcome = Build::new(&runner, &sink)
        .run(fixture.root(), BuildOptions::default())
        .unwrap();

    let translate = outcome
        .results
        .iter()
        .find(|r| r.stage == "translate")
        .unwrap();
    assert!(translate.succeeded);
    assert!(translate.skipped);
    assert!(outcome.diagnostics.iter().any(|d| d.stage == "translate"));
    assert!(
        sink.finished()
            .contains(&("translate".to_string(), StageState::Skipped))
    );
    assert!(
        !read_archive(&outcome.artifact.archive_path)
            .unwrap()
            .iter()
            .any(|m| m.starts_with("locale/"))
    );
}

#[test]
fn test_translation_failure_is_fatal() {
    let fixture = Fixture::new();
    fixture.write("po/fr.po", "broken\n");
    let runner = FakeRunner::new().failing("msgfmt", 1, "fr.po:1: syntax error");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("translate"));
    assert!(!fixture.archive("1.0.0").exists());
}

#[test]
fn test_resources_are_bundled() {
    let fixture = Fixture::new();
    fixture.write("data/ui/prefs.ui", "<interface/>\n");
    fixture.write("data/icons/clock-symbolic.svg", "<svg/>\n");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    let members = read_archive(&outcome.artifact.archive_path).unwrap();
    assert!(members.contains(&format!("{ID}.gresource")));
    assert!(!fixture.exists(&format!("src/{ID}.gresource")));

    let manifest = fixture.read(&format!("build/{ID}.gresource.xml"));
    let icons = manifest.find("icons/clock-symbolic.svg").unwrap();
    let ui = manifest.find("ui/prefs.ui").unwrap();
    assert!(icons < ui);
    assert!(manifest.contains(&format!("prefix=\"/org/gnome/shell/extensions/{ID}\"")));
}

#[test]
fn test_missing_resource_compiler_keeps_stale_archive() {
    let fixture = Fixture::new();
    fixture.write("data/icons/clock.svg", "<svg/>\n");
    fixture.write(&format!("build/{ID}.shell-extension-v1.0.0.zip"), "stale\n");
    let runner = FakeRunner::new().without_tool("glib-compile-resources");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("resources"));
    assert!(matches!(
        err.root_cause(),
        Error::ResourceCompilerNotFound { .. }
    ));
    assert_eq!(
        fixture.read(&format!("build/{ID}.shell-extension-v1.0.0.zip")),
        "stale\n"
    );
    assert!(!runner.ran("zip"));
}

#[test]
fn test_schemas_are_compiled_in_output_tree() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write(
        "src/schemas/org.gnome.shell.extensions.clock.gschema.xml",
        "<schemalist/>\n",
    );
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    let members = read_archive(&outcome.artifact.archive_path).unwrap();
    assert!(members.contains(&"schemas/gschemas.compiled".to_string()));
    assert!(members.contains(&"schemas/org.gnome.shell.extensions.clock.gschema.xml".to_string()));
    assert!(fixture.exists("dist/schemas/gschemas.compiled"));
}

#[test]
fn test_missing_schema_compiler_is_fatal() {
    let fixture = Fixture::new();
    fixture.write("src/schemas/org.gnome.shell.extensions.clock.gschema.xml", "<schemalist/>\n");
    let runner = FakeRunner::new().without_tool("glib-compile-schemas");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("schemas"));
    assert!(matches!(err.root_cause(), Error::SchemaCompilerNotFound { .. }));
}

#[test]
fn test_stage_order() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write("po/fr.po", "msgid \"\"\n");
    fixture.write("data/icons/clock.svg", "<svg/>\n");
    fixture.write("src/schemas/org.gnome.shell.extensions.clock.gschema.xml", "<schemalist/>\n");
    let runner = FakeRunner::new();
    let timing = TimingPlugin::new();
    let timings = timing.timings();

    let outcome = Build::new(&runner, &NullSink)
        .with_pipeline(Pipeline::new().plugin(timing))
        .run(fixture.root(), install())
        .unwrap();

    let stages: Vec<&str> = outcome.results.iter().map(|r| r.stage.as_str()).collect();
    assert_eq!(
        stages,
        vec![
            "compile",
            "translate",
            "resources",
            "schemas",
            "package",
            "install",
            "enable"
        ]
    );
    assert_eq!(timings.entries().len(), stages.len());
}

#[test]
fn test_packaging_failure_restores_output_tree() {
    let fixture = Fixture::new();
    fixture.write("LICENSE", "MIT\n");
    fixture.write("data/icons/clock.svg", "<svg/>\n");
    let runner = FakeRunner::new().failing("zip", 15, "zip error: could not create output file");

    let err = build(&fixture, &runner).unwrap_err();

    assert_eq!(err.stage(), Some("package"));
    assert!(matches!(err.root_cause(), Error::Packaging { .. }));
    assert_eq!(fixture.files("src"), vec!["extension.js", "stylesheet.css"]);
}

#[test]
fn test_missing_archive_tool_is_packaging_error() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new().without_tool("zip");

    let err = build(&fixture, &runner).unwrap_err();

    assert!(matches!(err.root_cause(), Error::Packaging { .. }));
    assert!(!fixture.exists("src/metadata.json"));
}

#[test]
fn test_previous_archive_is_replaced() {
    let fixture = Fixture::new();
    fixture.write(&format!("build/{ID}.shell-extension-v1.0.0.zip"), "stale\n");
    let runner = FakeRunner::new();

    let outcome = build(&fixture, &runner).unwrap();

    assert!(read_archive(&outcome.artifact.archive_path).is_some());
}

#[test]
fn test_install_and_enable() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let outcome = Build::new(&runner, &NullSink)
        .run(fixture.root(), install())
        .unwrap();

    let lines = runner.command_lines();
    let archive = outcome.artifact.archive_path.display().to_string();
    assert!(lines.contains(&format!("gnome-extensions install --force {archive}")));
    assert!(lines.contains(&format!("gnome-extensions enable {ID}")));
    assert!(!runner.ran("busctl"));
    assert_eq!(outcome.reload, ReloadState::ManualRestartRequired);
}

#[test]
fn test_unsafe_reload() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let outcome = Build::new(&runner, &NullSink)
        .run(
            fixture.root(),
            BuildOptions {
                install: true,
                unsafe_reload: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

    assert!(runner.ran("busctl"));
    assert_eq!(outcome.reload, ReloadState::Reloaded);
}

#[test]
fn test_refused_reload_fails() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new().with_reload_reply("bs false \"\"\n");

    let err = Build::new(&runner, &NullSink)
        .run(
            fixture.root(),
            BuildOptions {
                install: true,
                unsafe_reload: true,
                ..BuildOptions::default()
            },
        )
        .unwrap_err();

    assert_eq!(err.stage(), Some("reload"));
    assert!(matches!(err.root_cause(), Error::ReloadRefused { .. }));
}

#[test]
fn test_reload_without_install_is_ignored() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();

    let outcome = Build::new(&runner, &NullSink)
        .run(
            fixture.root(),
            BuildOptions {
                unsafe_reload: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

    assert!(!runner.ran("gnome-extensions"));
    assert!(!runner.ran("busctl"));
    assert_eq!(outcome.reload, ReloadState::NotRequested);
}

#[test]
fn test_failed_install_then_retry_starts_clean() {
    let fixture = Fixture::typed();
    fixture.mkdir("node_modules");
    fixture.write("LICENSE", "MIT\n");

    let failing = FakeRunner::new().failing("gnome-extensions", 1, "not running under GNOME");
    let err = Build::new(&failing, &NullSink)
        .run(fixture.root(), install())
        .unwrap_err();
    assert_eq!(err.stage(), Some("install"));
    assert!(
        !failing
            .command_lines()
            .contains(&format!("gnome-extensions enable {ID}"))
    );
    assert!(!fixture.exists("dist/metadata.json"));
    assert!(!fixture.exists("dist/LICENSE"));

    let runner = FakeRunner::new();
    let outcome = Build::new(&runner, &NullSink)
        .run(fixture.root(), install())
        .unwrap();

    assert_eq!(
        read_archive(&outcome.artifact.archive_path).unwrap(),
        vec![
            "LICENSE",
            "extension.js",
            "metadata.json",
            "prefs.js",
            "stylesheet.css"
        ]
    );
    assert!(!fixture.exists("dist/metadata.json"));
}

#[test]
fn test_not_a_project_runs_nothing() {
    let fixture = Fixture::new();
    fixture.remove("metadata.json");
    let runner = FakeRunner::new();
    let sink = RecordingSink::new();

    let err = Build::new(&runner, &sink)
        .run(fixture.root(), BuildOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::NotAProjectDirectory { .. }));
    assert!(runner.calls().is_empty());
    assert_eq!(
        sink.finished(),
        vec![("inspect".to_string(), StageState::Failed)]
    );
}

#[test]
fn test_status_lines() {
    let fixture = Fixture::new();
    let runner = FakeRunner::new();
    let sink = RecordingSink::new();

    Build::new(&runner, &sink)
        .run(fixture.root(), BuildOptions::default())
        .unwrap();

    let lines = sink.lines();
    assert_eq!(lines[0], "start inspect: inspecting project");
    assert_eq!(
        lines[1],
        format!("done inspect: {ID} v1.0.0 (no toolchain stages)")
    );
    assert_eq!(lines[2], "start package: packaging extension");
    assert!(lines[3].starts_with("done package: wrote "));
}
