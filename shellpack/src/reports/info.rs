//! Info command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from project info.
#[derive(Debug)]
pub struct InfoReport {
    /// Extension id (`uuid`).
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub shell_versions: Vec<String>,
    pub root: PathBuf,
    /// Tree that becomes the archive root, relative to `root`.
    pub output_dir: String,
    /// Archive a build would write, relative to `root`.
    pub archive: String,
    /// Toolchain stages a build would run.
    pub stages: Vec<String>,
    pub use_esbuild: bool,
    /// `[tools]` overrides from shellpack.toml.
    pub tool_overrides: Vec<(String, String)>,
}

impl Report for InfoReport {
    fn render(&self, out: &mut dyn Output) {
        out.newline();

        // Header
        out.preformatted(&format!("  {}", self.name));
        out.preformatted(&format!("  {}", "─".repeat(self.name.chars().count())));
        if let Some(desc) = &self.description {
            out.preformatted(&format!("  {}", desc));
        }
        out.newline();

        out.preformatted(&format!("  Id          {}", self.id));
        out.preformatted(&format!("  Version     {}", self.version));
        if !self.shell_versions.is_empty() {
            out.preformatted(&format!("  Shell       {}", self.shell_versions.join(", ")));
        }
        out.preformatted(&format!("  Root        {}", self.root.display()));
        out.newline();

        // Build
        out.preformatted("  Build");
        out.preformatted("  ─────");
        out.preformatted(&format!("  Output      {}", self.output_dir));
        out.preformatted(&format!("  Archive     {}", self.archive));
        let stages = if self.stages.is_empty() {
            "none".to_string()
        } else {
            self.stages.join(", ")
        };
        out.preformatted(&format!("  Stages      {}", stages));
        if self.use_esbuild {
            out.preformatted("  Bundler     esbuild");
        }
        out.newline();

        if !self.tool_overrides.is_empty() {
            out.preformatted("  Tools");
            out.preformatted("  ─────");
            for (tool, program) in &self.tool_overrides {
                out.preformatted(&format!("  {:<11} {}", tool, program));
            }
            out.newline();
        }
    }
}
