//! Stage status reporting.
//!
//! Each stage reports progress through a [`StageStatus`] handle obtained
//! from [`StageStatus::begin`]. The handle is resolved exactly once; a handle
//! dropped without being resolved reports the stage as failed, so an early
//! return or a panic never leaves a status line hanging.

use std::fmt;

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Succeeded,
    Skipped,
    Failed,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageState::Succeeded => write!(f, "done"),
            StageState::Skipped => write!(f, "skipped"),
            StageState::Failed => write!(f, "failed"),
        }
    }
}

/// Receiver of stage status lines (a terminal, a log, a test recorder).
pub trait StatusSink: Sync {
    fn started(&self, stage: &str, message: &str);

    fn updated(&self, stage: &str, message: &str);

    fn finished(&self, stage: &str, state: StageState, message: &str);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn started(&self, _stage: &str, _message: &str) {}

    fn updated(&self, _stage: &str, _message: &str) {}

    fn finished(&self, _stage: &str, _state: StageState, _message: &str) {}
}

/// Live status of one running stage.
#[must_use = "a stage status reports failure when dropped unresolved"]
pub struct StageStatus<'a> {
    sink: &'a dyn StatusSink,
    stage: String,
    resolved: bool,
}

impl<'a> StageStatus<'a> {
    /// Announce that `stage` has started.
    pub fn begin(sink: &'a dyn StatusSink, stage: impl Into<String>, message: &str) -> Self {
        let stage = stage.into();
        sink.started(&stage, message);
        Self {
            sink,
            stage,
            resolved: false,
        }
    }

    /// Replace the progress message of the running stage.
    pub fn update(&mut self, message: &str) {
        self.sink.updated(&self.stage, message);
    }

    pub fn succeed(self, message: &str) {
        self.resolve(StageState::Succeeded, message);
    }

    pub fn skip(self, message: &str) {
        self.resolve(StageState::Skipped, message);
    }

    pub fn fail(self, message: &str) {
        self.resolve(StageState::Failed, message);
    }

    fn resolve(mut self, state: StageState, message: &str) {
        self.resolved = true;
        self.sink.finished(&self.stage, state, message);
    }
}

impl Drop for StageStatus<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.sink
                .finished(&self.stage, StageState::Failed, "interrupted");
        }
    }
}
