//! Archive assembly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use shellpack_core::{copy_file, remove_file_if_exists};
use shellpack_manifest::{ExtensionIdentity, METADATA_FILE};

use crate::{
    BuildContext, Error, Phase, PhaseOutcome, ProjectDescriptor, Result, StageStatus, Toolchain,
    layout::LICENSE_FILE,
};

/// The archive produced by a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub archive_path: PathBuf,
    pub identity: ExtensionIdentity,
}

/// Zips the compiled-output tree into `build/<id>.shell-extension-v<ver>.zip`.
///
/// The metadata file, the license and the resource bundle are copied into
/// the tree only for the duration of the archive call and removed again
/// whether or not it succeeds. A copy already sitting in the tree is
/// overwritten first, so the archive always carries the root files.
pub struct Packager<'a, 't> {
    project: &'a ProjectDescriptor,
    identity: &'a ExtensionIdentity,
    tools: &'a Toolchain<'t>,
}

impl<'a, 't> Packager<'a, 't> {
    pub fn new(
        project: &'a ProjectDescriptor,
        identity: &'a ExtensionIdentity,
        tools: &'a Toolchain<'t>,
    ) -> Self {
        Self {
            project,
            identity,
            tools,
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.project
            .build_dir()
            .join(self.identity.archive_file_name())
    }

    /// Build the archive, replacing any previous one of the same name.
    pub fn package(&self, resource_bundle: Option<&Path>) -> Result<BuildArtifact> {
        if !self.tools.available("zip") {
            return Err(Error::Packaging {
                message: "the archive tool is not available".into(),
                source: Some(Box::new(Error::ToolNotFound {
                    tool: self.tools.program("zip").to_string(),
                })),
            });
        }

        let output_dir = &self.project.output_dir;
        if !output_dir.is_dir() {
            return Err(Error::packaging(format!(
                "compiled-output tree '{}' does not exist",
                output_dir.display()
            )));
        }

        let build_dir = self.project.build_dir();
        fs::create_dir_all(&build_dir).map_err(|e| Error::io(&build_dir, e))?;
        let archive_path = self.archive_path();
        if remove_file_if_exists(&archive_path).map_err(|e| Error::io(&archive_path, e))? {
            tracing::debug!(archive = %archive_path.display(), "replaced previous archive");
        }

        let mut injected = InjectedFiles::default();
        let archived = self
            .inject(&mut injected, resource_bundle)
            .and_then(|()| self.archive(&archive_path));
        let cleaned = injected.remove();

        archived?;
        cleaned?;

        Ok(BuildArtifact {
            archive_path,
            identity: self.identity.clone(),
        })
    }

    fn inject(&self, injected: &mut InjectedFiles, resource_bundle: Option<&Path>) -> Result<()> {
        let output_dir = &self.project.output_dir;

        if let Some(bundle) = resource_bundle {
            injected.inject(bundle, &output_dir.join(self.identity.resource_file_name()))?;
        }
        injected.inject(
            &self.project.root.join(METADATA_FILE),
            &output_dir.join(METADATA_FILE),
        )?;

        let license = self.project.license_file();
        if license.is_file() {
            injected.inject(&license, &output_dir.join(LICENSE_FILE))?;
        }
        Ok(())
    }

    fn archive(&self, archive_path: &Path) -> Result<()> {
        let invocation = self
            .tools
            .invocation("zip", &self.project.output_dir)
            .arg("-qrX")
            .arg(archive_path)
            .arg(".");
        self.tools
            .run_or_fail(&invocation)
            .map(|_| ())
            .map_err(|e| Error::Packaging {
                message: "the archive tool failed".into(),
                source: Some(Box::new(e)),
            })
    }
}

/// Files copied into the compiled-output tree for packaging.
///
/// [`InjectedFiles::remove`] deletes them and reports errors; anything still
/// tracked when the guard is dropped is removed on a best-effort basis.
#[derive(Debug, Default)]
struct InjectedFiles {
    paths: Vec<PathBuf>,
}

impl InjectedFiles {
    /// Copy `src` to `dst`, replacing any file left there by an earlier run.
    fn inject(&mut self, src: &Path, dst: &Path) -> Result<()> {
        if dst.is_file() {
            tracing::debug!(path = %dst.display(), "replacing stale copy in output tree");
        }
        // Tracked before copying so a partial copy is still removed.
        self.paths.push(dst.to_path_buf());
        copy_file(src, dst).map_err(|e| Error::io(src, e))
    }

    fn remove(mut self) -> Result<()> {
        let mut first_error = None;
        for path in self.paths.drain(..) {
            if let Err(e) = remove_file_if_exists(&path) {
                first_error.get_or_insert(Error::io(&path, e));
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for InjectedFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            if let Err(e) = remove_file_if_exists(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove injected file");
            }
        }
    }
}

/// Runs the [`Packager`] as a pipeline stage.
pub struct PackagePhase;

impl Phase for PackagePhase {
    fn name(&self) -> &'static str {
        "package"
    }

    fn description(&self) -> &'static str {
        "packaging extension"
    }

    fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        _status: &mut StageStatus<'_>,
    ) -> Result<PhaseOutcome> {
        let artifact = Packager::new(&ctx.project, &ctx.identity, &ctx.tools)
            .package(ctx.resource_bundle.as_deref())?;

        let archive_path = artifact.archive_path.clone();
        ctx.artifact = Some(artifact);
        Ok(PhaseOutcome::produced(
            archive_path.clone(),
            format!("wrote {}", archive_path.display()),
        ))
    }
}
