//! Version command report data structures.

use super::output::{Output, Report};

/// Report data from a version change.
#[derive(Debug)]
pub struct VersionReport {
    pub previous: String,
    pub current: String,
    /// Integer release counter written to metadata.json.
    pub release: u64,
}

impl Report for VersionReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("{} → {}", self.previous, self.current));
        out.key_value("Release", &self.release.to_string());
    }
}
