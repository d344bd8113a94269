//! Pipeline plugin trait for extensibility.

use super::BuildContext;
use crate::Result;

/// A plugin that can hook into the build pipeline.
///
/// Plugins receive callbacks around each phase that applies to the project.
/// See [`super::TimingPlugin`] for an example.
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called before a phase runs. Return an error to abort the build.
    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut BuildContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after a phase completes or is skipped. Not called when the
    /// phase fails.
    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut BuildContext<'_>) -> Result<()> {
        Ok(())
    }
}
