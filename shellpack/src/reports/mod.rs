//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod build;
mod clean;
mod info;
mod output;
mod version;

pub use build::{BuildReport, StageLine};
pub use clean::CleanReport;
pub use info::InfoReport;
#[cfg(test)]
pub use output::BufferOutput;
pub use output::{Report, TerminalOutput};
pub use version::VersionReport;
