//! GResource bundling.

use std::fs;

use shellpack_core::{relative_files, to_posix_path, xml_escape};

use crate::{BuildContext, Error, Phase, PhaseOutcome, Result, StageStatus};

/// Resource path prefix under which an extension's bundle is registered.
pub const RESOURCE_PREFIX: &str = "/org/gnome/shell/extensions";

/// Bundles everything under `data/` into `build/<id>.gresource`.
///
/// The resource compiler is mandatory here: a non-empty `data/` must ship.
pub struct ResourcesPhase;

impl Phase for ResourcesPhase {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn description(&self) -> &'static str {
        "bundling resources"
    }

    fn applies_to(&self, ctx: &BuildContext<'_>) -> bool {
        ctx.project.has_resources
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let tool = "glib-compile-resources";
        if !ctx.tools.available(tool) {
            return Err(Error::ResourceCompilerNotFound {
                tool: ctx.tools.program(tool).to_string(),
            });
        }

        let data_dir = ctx.project.resources_dir();
        let mut files: Vec<String> = relative_files(&data_dir)
            .map_err(|e| Error::io(&data_dir, e))?
            .iter()
            .map(|p| to_posix_path(p))
            .collect();
        files.sort();

        let build_dir = ctx.project.build_dir();
        fs::create_dir_all(&build_dir).map_err(|e| Error::io(&build_dir, e))?;

        let id = &ctx.identity.id;
        let manifest_path = build_dir.join(format!("{id}.gresource.xml"));
        fs::write(&manifest_path, render_manifest(id, &files))
            .map_err(|e| Error::io(&manifest_path, e))?;

        status.update(&format!("compiling {} files", files.len()));
        let bundle = build_dir.join(ctx.identity.resource_file_name());
        let invocation = ctx
            .tools
            .invocation(tool, &ctx.project.root)
            .arg("--sourcedir")
            .arg(&data_dir)
            .arg("--target")
            .arg(&bundle)
            .arg(&manifest_path);
        ctx.tools.run_or_fail(&invocation)?;

        ctx.resource_bundle = Some(bundle.clone());
        Ok(PhaseOutcome::produced(
            bundle,
            format!("bundled {} files", files.len()),
        ))
    }
}

/// Render the resource manifest for `files`, given as `/`-separated paths
/// relative to `data/`. Entries are written in the order given.
pub fn render_manifest(id: &str, files: &[String]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gresources>\n");
    xml.push_str(&format!(
        "  <gresource prefix=\"{}/{}\">\n",
        RESOURCE_PREFIX,
        xml_escape(id)
    ));
    for file in files {
        xml.push_str(&format!("    <file>{}</file>\n", xml_escape(file)));
    }
    xml.push_str("  </gresource>\n</gresources>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_manifest() {
        let files = vec![
            "icons/clock-symbolic.svg".to_string(),
            "ui/prefs & more.ui".to_string(),
        ];

        insta::assert_snapshot!(render_manifest("clock@example.com", &files), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <gresources>
          <gresource prefix="/org/gnome/shell/extensions/clock@example.com">
            <file>icons/clock-symbolic.svg</file>
            <file>ui/prefs &amp; more.ui</file>
          </gresource>
        </gresources>
        "#);
    }

    #[test]
    fn test_render_empty_manifest() {
        let xml = render_manifest("a@b", &[]);
        assert!(xml.contains("<gresource prefix=\"/org/gnome/shell/extensions/a@b\">\n  </gresource>"));
    }
}
