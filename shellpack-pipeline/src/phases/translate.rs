//! Translation catalogs.

use std::{fs, path::PathBuf};

use shellpack_core::file_name_ends_with;

use crate::{
    BuildContext, Error, Phase, PhaseOutcome, Result, StageStatus, layout::TRANSLATION_SUFFIX,
};

/// Compiles every `po/<lang>.po` into
/// `<output>/locale/<lang>/LC_MESSAGES/<id>.mo`.
///
/// `msgfmt` is optional: without it the stage is skipped with a warning.
/// With it, the first failing catalog fails the build.
pub struct TranslatePhase;

impl Phase for TranslatePhase {
    fn name(&self) -> &'static str {
        "translate"
    }

    fn description(&self) -> &'static str {
        "compiling translations"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.project.has_translations
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        if !ctx.tools.available("msgfmt") {
            return Ok(PhaseOutcome::skipped(format!(
                "'{}' not found, translations were not compiled",
                ctx.tools.program("msgfmt")
            )));
        }

        let catalogs = translation_sources(ctx)?;
        let locale_dir = ctx.project.output_dir.join("locale");
        let catalog_name = ctx.identity.catalog_file_name();

        for source in &catalogs {
            let Some(lang) = source.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            status.update(&format!("compiling {lang}"));

            let target_dir = locale_dir.join(&lang).join("LC_MESSAGES");
            fs::create_dir_all(&target_dir).map_err(|e| Error::io(&target_dir, e))?;

            let invocation = ctx
                .tools
                .invocation("msgfmt", &ctx.project.root)
                .arg(source)
                .arg("-o")
                .arg(target_dir.join(&catalog_name));
            ctx.tools.run_or_fail(&invocation)?;
        }

        Ok(PhaseOutcome::produced(
            locale_dir,
            format!("compiled {} catalogs", catalogs.len()),
        ))
    }
}

/// `.po` files directly under `po/`, sorted by name.
fn translation_sources(ctx: &BuildContext<'_>) -> Result<Vec<PathBuf>> {
    let dir = ctx.project.translations_dir();
    let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(&dir, e))?.path();
        if path.is_file() && file_name_ends_with(&path, &[TRANSLATION_SUFFIX]) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}
