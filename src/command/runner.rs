//! Foreground command execution with captured output

use crate::error::{CheckerError, CheckerResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Build an output record directly (used by tests and fake stores)
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Both streams, stderr first (the runtime reports cache utilities there)
    pub fn combined(&self) -> String {
        let mut all = String::with_capacity(self.stderr.len() + self.stdout.len() + 1);
        all.push_str(&self.stderr);
        if !all.is_empty() && !all.ends_with('\n') {
            all.push('\n');
        }
        all.push_str(&self.stdout);
        all
    }
}

/// A command run to completion in the foreground
#[derive(Debug, Clone)]
pub struct ForegroundCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ForegroundCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Printable command line
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run and capture stdout/stderr. The child is killed if the future is dropped,
    /// so callers bound this with a deadline.
    pub async fn run(&self) -> CheckerResult<CommandOutput> {
        debug!("Executing: {}", self.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CheckerError::command_failed(self.display(), e))?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!("Exit code {:?} from {}", result.exit_code, self.program.display());
        Ok(result)
    }
}
