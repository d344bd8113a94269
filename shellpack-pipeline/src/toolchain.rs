//! Access to external tools with project overrides applied.

use std::path::Path;

use shellpack_core::{Invocation, ToolRunner};
use shellpack_manifest::ProjectConfig;

use crate::Result;

/// External tools as seen by one build.
///
/// Logical tool names (`zip`, `msgfmt`, ...) are mapped to executables
/// through the `[tools]` table of `shellpack.toml` before anything runs.
pub struct Toolchain<'a> {
    runner: &'a dyn ToolRunner,
    config: ProjectConfig,
}

impl<'a> Toolchain<'a> {
    pub fn new(runner: &'a dyn ToolRunner, config: ProjectConfig) -> Self {
        Self { runner, config }
    }

    /// Executable configured for a logical tool name.
    pub fn program<'s>(&'s self, tool: &'s str) -> &'s str {
        self.config.tool(tool)
    }

    pub fn available(&self, tool: &str) -> bool {
        self.runner.tool_available(self.program(tool))
    }

    /// Start an invocation of a logical tool.
    pub fn invocation(&self, tool: &str, work_dir: &Path) -> Invocation {
        Invocation::new(self.program(tool), work_dir)
    }

    /// Run and turn a non-zero exit into [`crate::Error::ToolExecution`].
    pub fn run_or_fail(&self, invocation: &Invocation) -> Result<String> {
        Ok(self.runner.run_or_fail(invocation)?)
    }

    /// First candidate whose executable is available.
    pub fn first_available<'c>(&self, candidates: &'c [Candidate]) -> Option<&'c Candidate> {
        candidates
            .iter()
            .find(|c| self.runner.tool_available(&c.invocation.program))
    }
}

/// One way of invoking a tool, tried as part of an ordered fallback chain.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Short description used when listing what was tried.
    pub label: String,
    pub invocation: Invocation,
}

impl Candidate {
    pub fn new(label: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            label: label.into(),
            invocation,
        }
    }
}
