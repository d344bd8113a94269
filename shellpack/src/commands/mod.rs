mod build;
mod clean;
mod completions;
mod info;
mod version;

use build::BuildCommand;
use clap::{Parser, Subcommand};
use clean::CleanCommand;
use completions::CompletionsCommand;
use eyre::Result;
use info::InfoCommand;
use version::VersionCommand;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for shellpack_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for shellpack_pipeline::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                if let Some(stage) = e.stage() {
                    eprintln!("error: the {} stage failed", stage);
                }
                eprintln!("{:?}", miette::Report::new(e.into_root_cause()));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "shellpack")]
#[command(version)]
#[command(about = "Build, package and install GNOME Shell extensions")]
pub(crate) struct Cli {
    /// Show debug logs (overridden by SHELLPACK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Build(cmd) => cmd.run(),
            Commands::Info(cmd) => cmd.run(),
            Commands::Clean(cmd) => cmd.run(),
            Commands::Version(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile, package and optionally install the extension
    Build(BuildCommand),

    /// Show the extension identity and which stages a build runs
    Info(InfoCommand),

    /// Remove build output
    Clean(CleanCommand),

    /// Set or bump the extension version
    Version(VersionCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "shellpack",
            "build",
            "-C",
            "ext",
            "--install",
            "--unsafe-reload",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Build(BuildCommand {
                install: true,
                unsafe_reload: true,
                use_esbuild: false,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_version_target() {
        assert!(Cli::try_parse_from(["shellpack", "version", "minor"]).is_ok());
        assert!(Cli::try_parse_from(["shellpack", "version", "2.1.0"]).is_ok());
        assert!(Cli::try_parse_from(["shellpack", "version", "next"]).is_err());
    }
}
