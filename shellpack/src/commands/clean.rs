use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CleanCommand {
    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,

    /// Preview what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::clean(&self.dir, self.dry_run).unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
