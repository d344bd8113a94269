//! Pipeline orchestrator.

use super::{BuildContext, Phase, PhaseOutcome, Plugin, StageResult};
use crate::{
    EnablePhase, Error, InstallPhase, PackagePhase, ReloadPhase, Result, StageStatus,
    phases::{CompilePhase, ResourcesPhase, SchemasPhase, TranslatePhase},
};

/// The build pipeline.
///
/// Runs each applicable phase in order with plugin hooks around it. The
/// first failing phase aborts the rest; its error comes back wrapped in
/// [`Error::Stage`] naming the phase.
///
/// # Example
///
/// ```ignore
/// let timing = TimingPlugin::new();
/// let timings = timing.timings();
/// Pipeline::new().plugin(timing).run(&mut ctx)?;
/// ```
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// The standard build:
    /// compile, translate, resources, schemas, package, install, enable, reload.
    pub fn new() -> Self {
        Self::empty()
            .phase(CompilePhase)
            .phase(TranslatePhase)
            .phase(ResourcesPhase)
            .phase(SchemasPhase)
            .phase(PackagePhase)
            .phase(InstallPhase)
            .phase(EnablePhase)
            .phase(ReloadPhase)
    }

    /// A pipeline with no phases.
    pub fn empty() -> Self {
        Self {
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Append a phase.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Names of the phases in execution order.
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Run every applicable phase on `ctx`.
    pub fn run(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        for phase in &self.phases {
            if !phase.applies_to(ctx) {
                tracing::debug!(stage = phase.name(), "stage not needed");
                continue;
            }
            self.run_phase(phase.as_ref(), ctx)?;
        }
        Ok(())
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut BuildContext<'_>) -> Result<()> {
        let name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(name, ctx)?;
        }

        let sink = ctx.status;
        let mut status = StageStatus::begin(sink, name, phase.description());

        match phase.run(ctx, &mut status) {
            Ok(PhaseOutcome::Completed { produced, summary }) => {
                status.succeed(&summary);
                ctx.results.push(StageResult {
                    stage: name.to_string(),
                    succeeded: true,
                    skipped: false,
                    produced,
                    diagnostic: None,
                });
            }
            Ok(PhaseOutcome::Skipped { reason }) => {
                status.skip(&reason);
                ctx.add_warning(name, reason.clone());
                ctx.results.push(StageResult {
                    stage: name.to_string(),
                    succeeded: true,
                    skipped: true,
                    produced: None,
                    diagnostic: Some(reason),
                });
            }
            Err(e) => {
                let message = e.to_string();
                status.fail(&message);
                ctx.results.push(StageResult {
                    stage: name.to_string(),
                    succeeded: false,
                    skipped: false,
                    produced: None,
                    diagnostic: Some(message),
                });
                return Err(Error::Stage {
                    stage: name.to_string(),
                    source: Box::new(e),
                });
            }
        }

        for plugin in &self.plugins {
            plugin.on_after_phase(name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
