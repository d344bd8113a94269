//! GSettings schema compilation.

use crate::{BuildContext, Error, Phase, PhaseOutcome, Result, StageStatus};

/// Compiles `<output>/schemas` in place, next to the schema sources.
pub struct SchemasPhase;

impl Phase for SchemasPhase {
    fn name(&self) -> &'static str {
        "schemas"
    }

    fn description(&self) -> &'static str {
        "compiling settings schemas"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.project.has_schemas
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        _status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let tool = "glib-compile-schemas";
        if !ctx.tools.available(tool) {
            return Err(Error::SchemaCompilerNotFound {
                tool: ctx.tools.program(tool).to_string(),
            });
        }

        let schemas_dir = ctx.project.output_schemas_dir();
        let invocation = ctx
            .tools
            .invocation(tool, &ctx.project.root)
            .arg(&schemas_dir);
        ctx.tools.run_or_fail(&invocation)?;

        Ok(PhaseOutcome::produced(
            schemas_dir.join("gschemas.compiled"),
            "compiled schemas",
        ))
    }
}
