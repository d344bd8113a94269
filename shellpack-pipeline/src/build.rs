//! Build orchestration.

use std::path::Path;

use shellpack_core::ToolRunner;
use shellpack_manifest::{ExtensionIdentity, ProjectConfig};

use crate::{
    BuildArtifact, BuildContext, BuildOptions, Error, Pipeline, ProjectDescriptor, ReloadState,
    Result, StageResult, StageStatus, StatusSink, Toolchain, inspect, pipeline::Diagnostic,
};

/// Everything a successful build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    pub artifact: BuildArtifact,
    pub project: ProjectDescriptor,
    pub results: Vec<StageResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub reload: ReloadState,
}

/// Inspects a project and drives it through a [`Pipeline`].
pub struct Build<'a> {
    runner: &'a dyn ToolRunner,
    status: &'a dyn StatusSink,
    pipeline: Pipeline,
}

impl<'a> Build<'a> {
    /// A build running the standard pipeline.
    pub fn new(runner: &'a dyn ToolRunner, status: &'a dyn StatusSink) -> Self {
        Self {
            runner,
            status,
            pipeline: Pipeline::new(),
        }
    }

    /// Replace the pipeline, e.g. to attach plugins.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Build the project rooted at `root`.
    ///
    /// Inspection and identity loading happen once, before any stage runs.
    /// The first failing stage aborts the build, including the host tail.
    pub fn run(&self, root: impl AsRef<Path>, options: BuildOptions) -> Result<BuildOutcome> {
        let status = StageStatus::begin(self.status, "inspect", "inspecting project");
        let (project, identity, config) = match prepare(root.as_ref()) {
            Ok(prepared) => prepared,
            Err(e) => {
                status.fail(&e.to_string());
                return Err(e);
            }
        };

        let stages = project.enabled_stages();
        status.succeed(&format!(
            "{} v{} ({})",
            identity.id,
            identity.version,
            if stages.is_empty() {
                "no toolchain stages".to_string()
            } else {
                stages.join(", ")
            }
        ));

        let options = BuildOptions {
            use_esbuild: options.use_esbuild || config.build.use_esbuild,
            ..options
        };
        let tools = Toolchain::new(self.runner, config);
        let mut ctx = BuildContext::new(project, identity, options, tools, self.status);

        self.pipeline.run(&mut ctx)?;

        if options.install && !options.unsafe_reload {
            ctx.reload = ReloadState::ManualRestartRequired;
        }

        let artifact = ctx
            .artifact
            .take()
            .ok_or_else(|| Error::packaging("the pipeline finished without an archive"))?;

        tracing::info!(archive = %artifact.archive_path.display(), "build finished");

        Ok(BuildOutcome {
            artifact,
            project: ctx.project,
            results: ctx.results,
            diagnostics: ctx.diagnostics,
            reload: ctx.reload,
        })
    }
}

fn prepare(root: &Path) -> Result<(ProjectDescriptor, ExtensionIdentity, ProjectConfig)> {
    let project = inspect(root)?;
    let identity = ExtensionIdentity::load(&project.root)?;
    let config = ProjectConfig::load(&project.root)?;
    Ok((project, identity, config))
}
