//! Stage status lines on the terminal.

use shellpack_pipeline::{StageState, StatusSink};

/// Writes one line per stage event to stderr.
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl TerminalStatus {
    pub fn new() -> Self {
        Self
    }
}

impl StatusSink for TerminalStatus {
    fn started(&self, stage: &str, message: &str) {
        eprintln!("  • {:<9} {}…", stage, message);
    }

    fn updated(&self, stage: &str, message: &str) {
        eprintln!("    {:<9} {}", stage, message);
    }

    fn finished(&self, stage: &str, state: StageState, message: &str) {
        let mark = match state {
            StageState::Succeeded => '✓',
            StageState::Skipped => '-',
            StageState::Failed => '✗',
        };
        eprintln!("  {} {:<9} {}", mark, stage, message);
    }
}
