use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, version::VersionChange},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct VersionCommand {
    /// `major`, `minor`, `patch` or an explicit version such as `1.4.0`
    pub change: VersionChange,

    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,
}

impl VersionCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::version(&self.dir, &self.change).unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
