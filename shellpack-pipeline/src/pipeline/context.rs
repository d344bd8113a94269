//! Build context passed through pipeline phases.

use std::path::PathBuf;

use shellpack_manifest::ExtensionIdentity;

use super::diagnostic::Diagnostic;
use crate::{
    BuildArtifact, ProjectDescriptor, StatusSink, Toolchain, host::ReloadState,
};

/// User choices for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Prefer the bundler config over the plain compiler.
    pub use_esbuild: bool,
    /// Install and enable the archive on the running shell.
    pub install: bool,
    /// Ask the shell to restart itself after installing.
    pub unsafe_reload: bool,
}

/// Outcome of one stage, as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub stage: String,
    pub succeeded: bool,
    /// Set when the stage was skipped for a non-fatal reason.
    pub skipped: bool,
    pub produced: Option<PathBuf>,
    pub diagnostic: Option<String>,
}

/// State carried through all phases of one build.
///
/// The project descriptor and identity are fixed when the context is
/// created; phases only add outputs, results and diagnostics.
pub struct BuildContext<'a> {
    pub project: ProjectDescriptor,
    pub identity: ExtensionIdentity,
    pub options: BuildOptions,
    pub tools: Toolchain<'a>,
    pub status: &'a dyn StatusSink,
    /// Compiled resource blob, set by the resources stage.
    pub resource_bundle: Option<PathBuf>,
    /// The archive, set by the package stage.
    pub artifact: Option<BuildArtifact>,
    pub reload: ReloadState,
    pub results: Vec<StageResult>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        project: ProjectDescriptor,
        identity: ExtensionIdentity,
        options: BuildOptions,
        tools: Toolchain<'a>,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            project,
            identity,
            options,
            tools,
            status,
            resource_bundle: None,
            artifact: None,
            reload: ReloadState::NotRequested,
            results: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, stage: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(stage, message));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Result recorded for `stage`, if it ran.
    pub fn result(&self, stage: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    /// Names of the stages that ran, in order.
    pub fn stages_run(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.stage.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use shellpack_core::Version;
    use shellpack_manifest::ProjectConfig;

    use super::*;
    use crate::{NullSink, testing::FakeRunner};

    #[test]
    fn test_context_diagnostics() {
        let runner = FakeRunner::new();
        let mut ctx = BuildContext::new(
            ProjectDescriptor::new(PathBuf::from("/p"), false),
            ExtensionIdentity {
                id: "clock@example.com".into(),
                display_name: "Clock".into(),
                version: Version::new(1, 0, 0),
            },
            BuildOptions::default(),
            Toolchain::new(&runner, ProjectConfig::default()),
            &NullSink,
        );

        assert!(!ctx.has_warnings());
        ctx.add_warning("translate", "msgfmt not found");

        assert!(ctx.has_warnings());
        assert_eq!(ctx.diagnostics[0].stage, "translate");
        assert!(ctx.result("translate").is_none());
    }
}
