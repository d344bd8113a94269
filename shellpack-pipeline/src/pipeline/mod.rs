//! Build pipeline.
//!
//! This module provides a [`Pipeline`] that runs the build stages over a
//! shared [`BuildContext`]:
//!
//! - Gated phases (compile → translate → resources → schemas → package → host tail)
//! - Plugin hooks around each phase
//! - Non-fatal diagnostics collected alongside per-stage results

mod context;
mod diagnostic;
mod phase;
mod plugin;
mod runner;
mod timing;

pub use context::{BuildContext, BuildOptions, StageResult};
pub use diagnostic::Diagnostic;
pub use phase::{Phase, PhaseOutcome};
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use timing::{TimingPlugin, Timings};
