//! Hand-off to the running shell: install, enable and reload.

use crate::{BuildContext, Error, Phase, PhaseOutcome, Result, StageStatus};

/// Script evaluated by the shell to restart itself.
pub const RELOAD_SCRIPT: &str = r#"Meta.restart("Restarting…", global.context)"#;

/// What happened to the running shell after the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    /// The archive was not installed.
    NotRequested,
    /// The shell restarted itself.
    Reloaded,
    /// The user has to log out and back in to load the new version.
    ManualRestartRequired,
}

fn archive_of<'c>(ctx: &'c BuildContext<'_>) -> Result<&'c std::path::Path> {
    ctx.artifact
        .as_ref()
        .map(|a| a.archive_path.as_path())
        .ok_or_else(|| Error::packaging("no archive was produced"))
}

/// `gnome-extensions install --force <archive>`.
pub struct InstallPhase;

impl Phase for InstallPhase {
    fn name(&self) -> &'static str {
        "install"
    }

    fn description(&self) -> &'static str {
        "installing extension"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.options.install
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        _status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let archive = archive_of(ctx)?;
        let invocation = ctx
            .tools
            .invocation("gnome-extensions", &ctx.project.root)
            .args(["install", "--force"])
            .arg(archive);
        ctx.tools.run_or_fail(&invocation)?;

        Ok(PhaseOutcome::completed(format!(
            "installed {}",
            ctx.identity.id
        )))
    }
}

/// `gnome-extensions enable <id>`.
pub struct EnablePhase;

impl Phase for EnablePhase {
    fn name(&self) -> &'static str {
        "enable"
    }

    fn description(&self) -> &'static str {
        "enabling extension"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.options.install
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        _status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let invocation = ctx
            .tools
            .invocation("gnome-extensions", &ctx.project.root)
            .arg("enable")
            .arg(&ctx.identity.id);
        ctx.tools.run_or_fail(&invocation)?;

        Ok(PhaseOutcome::completed(format!("enabled {}", ctx.identity.id)))
    }
}

/// Asks the shell to restart through its `Eval` D-Bus method.
///
/// Only honoured when the shell runs in unsafe mode; a refusal fails the
/// build so the user is not left believing the new version is loaded.
pub struct ReloadPhase;

impl Phase for ReloadPhase {
    fn name(&self) -> &'static str {
        "reload"
    }

    fn description(&self) -> &'static str {
        "reloading the shell"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.options.install && ctx.options.unsafe_reload
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        _status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let invocation = ctx
            .tools
            .invocation("busctl", &ctx.project.root)
            .args([
                "--user",
                "call",
                "org.gnome.Shell",
                "/org/gnome/Shell",
                "org.gnome.Shell",
                "Eval",
                "s",
                RELOAD_SCRIPT,
            ]);
        let reply = ctx.tools.run_or_fail(&invocation)?;

        if !eval_succeeded(&reply) {
            return Err(Error::ReloadRefused {
                response: reply.trim().to_string(),
            });
        }

        ctx.reload = ReloadState::Reloaded;
        Ok(PhaseOutcome::completed("shell restarted"))
    }
}

/// `Eval` replies `bs <success> <result>`.
fn eval_succeeded(reply: &str) -> bool {
    let mut parts = reply.split_whitespace();
    parts.next() == Some("bs") && parts.next() == Some("true")
}
