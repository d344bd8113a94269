//! TypeScript compilation.

use shellpack_core::{
    Invocation, copy_tree_filtered, file_name_ends_with, remove_dir_if_exists,
};

use crate::{
    BuildContext, Error, Phase, PhaseOutcome, Result, StageStatus,
    layout::{BUNDLER_CONFIG, DEPENDENCIES_DIR, TYPED_SOURCE_SUFFIXES},
    pipeline::Diagnostic,
    toolchain::Candidate,
};

/// Compiles `src/` into `dist/` from scratch, then copies every non-source
/// file across so assets survive transpilation.
pub struct CompilePhase;

impl Phase for CompilePhase {
    fn name(&self) -> &'static str {
        "compile"
    }

    fn description(&self) -> &'static str {
        "compiling TypeScript sources"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.project.uses_typed_source
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let output_dir = ctx.project.output_dir.clone();
        if remove_dir_if_exists(&output_dir).map_err(|e| Error::io(&output_dir, e))? {
            tracing::debug!(dir = %output_dir.display(), "removed previous output");
        }

        if !ctx.project.dependencies_dir().is_dir() {
            status.update("installing dependencies");
            let tool = install_tool(ctx);
            let install = ctx.tools.invocation(tool, &ctx.project.root).arg("install");
            ctx.tools.run_or_fail(&install)?;
        }

        let compiler = select_compiler(ctx)?;
        status.update(&format!("running {}", compiler.label));
        ctx.tools.run_or_fail(&compiler.invocation)?;

        status.update("copying assets");
        let source_dir = ctx.project.source_dir();
        let copied = if source_dir.is_dir() {
            copy_tree_filtered(&source_dir, &output_dir, |path| {
                file_name_ends_with(path, TYPED_SOURCE_SUFFIXES)
            })
            .map_err(|e| Error::io(&source_dir, e))?
        } else {
            Vec::new()
        };

        Ok(PhaseOutcome::produced(
            output_dir,
            format!("compiled with {}, copied {} assets", compiler.label, copied.len()),
        ))
    }
}

/// Package manager matching the lockfile in the project root.
fn install_tool(ctx: &BuildContext<'_>) -> &'static str {
    let root = &ctx.project.root;
    if root.join("pnpm-lock.yaml").is_file() {
        "pnpm"
    } else if root.join("yarn.lock").is_file() {
        "yarn"
    } else {
        "npm"
    }
}

/// Pick the bundler when asked for and configured, otherwise the first
/// available compiler candidate.
fn select_compiler(ctx: &mut BuildContext<'_>) -> Result<Candidate> {
    let root = ctx.project.root.clone();

    if ctx.options.use_esbuild {
        if ctx.project.bundler_config().is_file() {
            let invocation = ctx.tools.invocation("node", &root).arg(BUNDLER_CONFIG);
            return Ok(Candidate::new("esbuild", invocation));
        }
        ctx.add_diagnostic(
            Diagnostic::warning(
                "compile",
                "esbuild was requested but no bundler config exists, falling back to tsc",
            )
            .at(BUNDLER_CONFIG),
        );
    }

    let out_dir = ctx.project.output_dir.clone();
    let local = root.join(DEPENDENCIES_DIR).join(".bin").join("tsc");
    let candidates = vec![
        Candidate::new(
            "local tsc",
            Invocation::new(local.to_string_lossy(), &root).arg("--outDir").arg(&out_dir),
        ),
        Candidate::new(
            "tsc",
            ctx.tools
                .invocation("tsc", &root)
                .arg("--outDir")
                .arg(&out_dir),
        ),
        Candidate::new(
            "npx tsc",
            ctx.tools
                .invocation("npx", &root)
                .args(["tsc", "--outDir"])
                .arg(&out_dir),
        ),
    ];

    match ctx.tools.first_available(&candidates) {
        Some(candidate) => Ok(candidate.clone()),
        None => Err(Error::CompilerNotFound {
            tried: candidates
                .iter()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
