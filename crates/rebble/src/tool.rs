//! Typed wrapper around the `rebble` command-line tool
//!
//! Every invocation streams the tool's own output to the terminal; a
//! non-zero exit becomes [`RebbleError::CommandFailed`].

use crate::error::{RebbleError, Result};
use sealines_core::process::CommandRunner;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// File name of the screenshot captured for `platform`
///
/// The platform identifier is used verbatim.
pub fn screenshot_filename(platform: &str) -> String {
    format!("screenshot_{}.png", platform)
}

/// One invocation of the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ToolCommand {
    /// Build the watch app
    Build,
    /// Reset emulator state
    Wipe,
    /// Terminate the running emulator
    Kill,
    /// Install the built app on the emulator for a platform
    Install {
        /// Emulator platform
        platform: String,
    },
    /// Capture the emulator screen to a file
    Screenshot {
        /// Output PNG path
        output: String,
    },
}

impl ToolCommand {
    /// Install on the emulator for `platform`
    pub fn install(platform: impl Into<String>) -> Self {
        ToolCommand::Install {
            platform: platform.into(),
        }
    }

    /// Screenshot named after `platform`
    pub fn screenshot_for(platform: &str) -> Self {
        ToolCommand::Screenshot {
            output: screenshot_filename(platform),
        }
    }

    /// Argument vector passed to the tool
    pub fn args(&self) -> Vec<&str> {
        match self {
            ToolCommand::Build => vec!["build"],
            ToolCommand::Wipe => vec!["wipe"],
            ToolCommand::Kill => vec!["kill"],
            ToolCommand::Install { platform } => vec!["install", "--emulator", platform.as_str()],
            ToolCommand::Screenshot { output } => vec!["screenshot", output.as_str()],
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

/// The tool bound to a [`CommandRunner`]
#[derive(Debug)]
pub struct Rebble<R> {
    program: String,
    runner: R,
}

impl<R: CommandRunner> Rebble<R> {
    /// Drive `program` through `runner`
    pub fn new(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Borrow the underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Command line as it would be typed in a shell
    pub fn command_line(&self, command: &ToolCommand) -> String {
        format!("{} {}", self.program, command)
    }

    /// Run one invocation and wait for it to exit
    pub fn run(&mut self, command: &ToolCommand) -> Result<()> {
        let args = command.args();
        debug!(program = %self.program, ?args, "invoking tool");

        let exit_code = self.runner.run_streaming(&self.program, &args)?;
        if exit_code == Some(0) {
            return Ok(());
        }

        let command = self.command_line(command);
        warn!(%command, ?exit_code, "tool invocation failed");
        Err(RebbleError::CommandFailed { command, exit_code })
    }
}
