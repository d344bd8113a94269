//! Build pipeline for GNOME Shell extensions.
//!
//! A build inspects the project once, runs the applicable toolchain stages
//! in order, packages the compiled-output tree into a flat archive and
//! optionally hands the archive to the running shell.
//!
//! # Example
//!
//! ```ignore
//! use shellpack_core::SystemRunner;
//! use shellpack_pipeline::{Build, BuildOptions, NullSink};
//!
//! let runner = SystemRunner::new();
//! let outcome = Build::new(&runner, &NullSink).run(".", BuildOptions::default())?;
//! println!("{}", outcome.artifact.archive_path.display());
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod build;
mod error;
mod host;
mod inspect;
mod layout;
mod package;
pub mod phases;
pub mod pipeline;
mod status;
mod toolchain;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use build::{Build, BuildOutcome};
pub use error::{Error, Result};
pub use host::{EnablePhase, InstallPhase, RELOAD_SCRIPT, ReloadPhase, ReloadState};
pub use inspect::inspect;
pub use layout::ProjectDescriptor;
pub use package::{BuildArtifact, PackagePhase, Packager};
pub use pipeline::{BuildContext, BuildOptions, Phase, PhaseOutcome, Pipeline, Plugin, StageResult};
pub use status::{NullSink, StageState, StageStatus, StatusSink};
pub use toolchain::{Candidate, Toolchain};
