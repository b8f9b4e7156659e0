//! Process execution utilities
//!
//! External tools are driven through the [`CommandRunner`] trait so callers
//! can swap the real process spawner for a recording one in tests.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Executes external programs with inherited stdio.
pub trait CommandRunner {
    /// Run `program` with `args`, streaming its output to the terminal.
    ///
    /// Returns the exit code, or `None` when the process was terminated by
    /// a signal. An `Err` means the program could not be started at all.
    fn run_streaming(&mut self, program: &str, args: &[&str]) -> Result<Option<i32>>;
}

/// [`CommandRunner`] that spawns real processes in the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run_streaming(&mut self, program: &str, args: &[&str]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(program, e))?;
        Ok(status.code())
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::command_not_found(program).with_source(err)
    } else {
        Error::process(format!("Failed to execute {}: {}", program, err)).with_source(err)
    }
}

/// Result of a captured command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run a command and capture output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(program, e))?;

    Ok(CommandResult::from_output(output))
}

/// Check if a command exists in PATH (or is a runnable path)
pub fn command_exists(program: &str) -> bool {
    which_command(program).is_some()
}

/// Get the path to a command
pub fn which_command(program: &str) -> Option<PathBuf> {
    if Path::new(program).components().count() > 1 {
        let path = PathBuf::from(program);
        return path.is_file().then_some(path);
    }
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_process_runner_exit_codes() {
        let mut runner = ProcessRunner;
        assert_eq!(runner.run_streaming("true", &[]).unwrap(), Some(0));
        assert_eq!(runner.run_streaming("sh", &["-c", "exit 7"]).unwrap(), Some(7));
    }

    #[test]
    fn test_process_runner_missing_program() {
        let mut runner = ProcessRunner;
        let err = runner
            .run_streaming("nonexistent_command_12345", &[])
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::CommandNotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exists_sh() {
        assert!(command_exists("sh"));
    }

    #[test]
    fn test_command_exists_nonexistent() {
        assert!(!command_exists("nonexistent_command_12345"));
        assert!(!command_exists("./no/such/tool"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_echo() {
        let result = run_command("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("hello"));
    }
}
