use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InfoCommand {
    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,
}

impl InfoCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::info(&self.dir).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
