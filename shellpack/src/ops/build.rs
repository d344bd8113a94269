//! Build operation - run the pipeline and summarize it.

use std::path::Path;

use shellpack_core::ToolRunner;
use shellpack_pipeline::{
    Build, BuildOptions, Pipeline, Result, StatusSink, pipeline::TimingPlugin,
};

use crate::reports::{BuildReport, StageLine};

/// Execute the build operation.
///
/// Runs the standard pipeline with stage timing enabled.
pub fn build(
    runner: &dyn ToolRunner,
    status: &dyn StatusSink,
    root: &Path,
    options: BuildOptions,
) -> Result<BuildReport> {
    let timing = TimingPlugin::new();
    let timings = timing.timings();

    let outcome = Build::new(runner, status)
        .with_pipeline(Pipeline::new().plugin(timing))
        .run(root, options)?;

    let durations = timings.entries();
    let stages = outcome
        .results
        .iter()
        .map(|result| StageLine {
            name: result.stage.clone(),
            skipped: result.skipped,
            duration: durations
                .iter()
                .find(|(stage, _)| *stage == result.stage)
                .map(|(_, d)| *d),
        })
        .collect();

    let archive = outcome
        .artifact
        .archive_path
        .strip_prefix(&outcome.project.root)
        .unwrap_or(&outcome.artifact.archive_path)
        .to_path_buf();

    Ok(BuildReport {
        id: outcome.artifact.identity.id.clone(),
        version: outcome.artifact.identity.version.to_string(),
        archive,
        stages,
        warnings: outcome
            .diagnostics
            .iter()
            .map(|d| match &d.location {
                Some(location) => format!("{} ({})", d.message, location),
                None => d.message.clone(),
            })
            .collect(),
        reload: outcome.reload,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use shellpack_pipeline::{
        NullSink, ReloadState,
        testing::{FakeRunner, Fixture},
    };

    use super::*;

    #[test]
    fn test_build_report() {
        let fixture = Fixture::new();
        fixture.write("po/fr.po", "msgid \"\"\n");
        let runner = FakeRunner::new().without_tool("msgfmt");

        let report = build(
            &runner,
            &NullSink,
            fixture.root(),
            BuildOptions {
                install: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

        assert_eq!(report.id, "clock@example.com");
        assert_eq!(report.version, "1.0.0");
        assert_eq!(
            report.archive,
            PathBuf::from("build/clock@example.com.shell-extension-v1.0.0.zip")
        );
        let names: Vec<&str> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["translate", "package", "install", "enable"]);
        assert!(report.stages[0].skipped);
        assert!(report.stages.iter().all(|s| s.duration.is_some()));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.reload, ReloadState::ManualRestartRequired);
    }
}
