//! External tool invocation.
//!
//! Every toolchain stage talks to its tools through [`ToolRunner`], so the
//! pipeline can be driven by [`SystemRunner`] in production and by a scripted
//! runner in tests.

use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use thiserror::Error;

/// A single external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name (looked up on `PATH`) or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<OsString>,
    /// Working directory for the process.
    pub work_dir: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: work_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments rendered lossily, for matching and display.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Captured result of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors raised while invoking a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("'{tool}' was not found on PATH")]
    NotFound { tool: String },

    #[error("failed to start '{tool}'")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("'{tool}' exited with status {exit_code}")]
    Failed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },
}

/// Contract for running external tools.
pub trait ToolRunner: Send + Sync {
    /// Run a tool to completion.
    ///
    /// A non-zero exit is *not* an error here; callers inspect
    /// [`ToolOutput::exit_code`]. Errors are reserved for tools that could not
    /// be started at all.
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError>;

    /// Check whether `program` can be executed.
    ///
    /// Bare names are resolved through `PATH`; anything containing a path
    /// separator must point at an existing file.
    fn tool_available(&self, program: &str) -> bool;

    /// Run a tool and fail with [`ToolError::Failed`] on a non-zero exit.
    ///
    /// Returns the captured standard output.
    fn run_or_fail(&self, invocation: &Invocation) -> Result<String, ToolError> {
        let output = self.run(invocation)?;
        if output.succeeded() {
            Ok(output.stdout)
        } else {
            Err(ToolError::Failed {
                tool: invocation.program.clone(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

/// [`ToolRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

fn is_path_like(program: &str) -> bool {
    Path::new(program).components().count() > 1
}

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        tracing::debug!(
            command = %invocation,
            cwd = %invocation.work_dir.display(),
            "running tool"
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.work_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ToolError::NotFound {
                    tool: invocation.program.clone(),
                },
                _ => ToolError::Spawn {
                    tool: invocation.program.clone(),
                    source,
                },
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(tool = %invocation.program, exit_code, "tool finished");

        Ok(ToolOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn tool_available(&self, program: &str) -> bool {
        if is_path_like(program) {
            Path::new(program).is_file()
        } else {
            which::which(program).is_ok()
        }
    }
}
