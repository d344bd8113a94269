use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use shellpack_core::SystemRunner;
use shellpack_pipeline::BuildOptions;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
    status::TerminalStatus,
};

#[derive(Args)]
pub struct BuildCommand {
    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,

    /// Install and enable the extension after packaging
    #[arg(long)]
    pub install: bool,

    /// Restart GNOME Shell after installing (only works in unsafe mode)
    #[arg(long)]
    pub unsafe_reload: bool,

    /// Compile with esbuild.config.mjs instead of tsc
    #[arg(long)]
    pub use_esbuild: bool,
}

impl BuildCommand {
    pub fn run(&self) -> Result<()> {
        let runner = SystemRunner::new();
        let status = TerminalStatus::new();

        let report = ops::build(
            &runner,
            &status,
            &self.dir,
            BuildOptions {
                use_esbuild: self.use_esbuild,
                install: self.install,
                unsafe_reload: self.unsafe_reload,
            },
        )
        .unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
