//! Pipeline phase trait.

use std::path::PathBuf;

use super::BuildContext;
use crate::{Result, StageStatus};

/// How a phase that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Completed {
        /// Main output of the phase, if it has one.
        produced: Option<PathBuf>,
        summary: String,
    },
    /// An optional tool was missing; the build carries on.
    Skipped { reason: String },
}

impl PhaseOutcome {
    pub fn completed(summary: impl Into<String>) -> Self {
        PhaseOutcome::Completed {
            produced: None,
            summary: summary.into(),
        }
    }

    pub fn produced(path: impl Into<PathBuf>, summary: impl Into<String>) -> Self {
        PhaseOutcome::Completed {
            produced: Some(path.into()),
            summary: summary.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        PhaseOutcome::Skipped {
            reason: reason.into(),
        }
    }
}

/// A stage of the build pipeline.
///
/// Phases run strictly in order. A phase whose [`Phase::applies_to`] returns
/// false is not run at all and reports nothing. Returning an error aborts
/// every later phase.
pub trait Phase: Send + Sync {
    /// The name of this phase (used in status lines and errors).
    fn name(&self) -> &'static str;

    /// Short progress message shown while the phase runs.
    fn description(&self) -> &'static str;

    /// Whether the project and options call for this phase.
    #[allow(unused_variables)]
    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        true
    }

    /// Run this phase.
    ///
    /// `status` is already started; the runner resolves it from the
    /// returned outcome, phases only call [`StageStatus::update`].
    fn run(&self, ctx: &mut BuildContext<'_>, status: &mut StageStatus<'_>)
    -> Result<PhaseOutcome>;
}
