//! Build command report data structures.

use std::{path::PathBuf, time::Duration};

use shellpack_pipeline::ReloadState;

use super::output::{Output, Report};

/// Report data from a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub id: String,
    pub version: String,
    /// Archive path, relative to the project root.
    pub archive: PathBuf,
    /// Stages that ran, in order.
    pub stages: Vec<StageLine>,
    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,
    pub reload: ReloadState,
}

/// One stage that ran.
#[derive(Debug)]
pub struct StageLine {
    pub name: String,
    pub skipped: bool,
    pub duration: Option<Duration>,
}

impl Report for BuildReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        out.preformatted(&format!("{} v{}", self.id, self.version));
        out.key_value("Archive", &self.archive.display().to_string());

        if !self.stages.is_empty() {
            out.newline();
            out.section("Stages");
            for stage in &self.stages {
                let detail = match (stage.skipped, stage.duration) {
                    (true, _) => " (skipped)".to_string(),
                    (false, Some(d)) => format!(" ({:.2}s)", d.as_secs_f64()),
                    (false, None) => String::new(),
                };
                out.list_item(&format!("{}{}", stage.name, detail));
            }
        }

        match self.reload {
            ReloadState::NotRequested => {}
            ReloadState::Reloaded => {
                out.newline();
                out.preformatted("GNOME Shell restarted with the new version.");
            }
            ReloadState::ManualRestartRequired => {
                out.newline();
                out.preformatted("Log out and back in to load the new version.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::BufferOutput;

    #[test]
    fn test_render() {
        let report = BuildReport {
            id: "clock@example.com".into(),
            version: "1.2.0".into(),
            archive: PathBuf::from("build/clock@example.com.shell-extension-v1.2.0.zip"),
            stages: vec![
                StageLine {
                    name: "translate".into(),
                    skipped: true,
                    duration: Some(Duration::from_millis(3)),
                },
                StageLine {
                    name: "package".into(),
                    skipped: false,
                    duration: Some(Duration::from_millis(250)),
                },
            ],
            warnings: vec!["'msgfmt' not found, translations were not compiled".into()],
            reload: ReloadState::ManualRestartRequired,
        };
        let mut out = BufferOutput::default();

        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "warning: 'msgfmt' not found, translations were not compiled",
                "clock@example.com v1.2.0",
                "Archive: build/clock@example.com.shell-extension-v1.2.0.zip",
                "",
                "Stages:",
                "  - translate (skipped)",
                "  - package (0.25s)",
                "",
                "Log out and back in to load the new version.",
            ]
        );
    }
}
