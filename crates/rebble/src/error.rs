//! Error types for tool invocations

use sealines_core::error::exit_codes;
use thiserror::Error;

/// Result alias for tool operations
pub type Result<T> = std::result::Result<T, RebbleError>;

/// Failures while driving the tool
#[derive(Error, Debug)]
pub enum RebbleError {
    /// Configuration, manifest or process-spawn failure
    #[error(transparent)]
    Core(#[from] sealines_core::Error),

    /// The tool ran and exited unsuccessfully
    #[error("`{command}` {}", describe_exit(.exit_code))]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        exit_code: Option<i32>,
    },

    /// `--platform` named something the manifest does not target
    #[error("Unknown platform '{platform}' (manifest targets: {})", .available.join(", "))]
    UnknownPlatform {
        /// Requested platform
        platform: String,
        /// Platforms listed in the manifest
        available: Vec<String>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl RebbleError {
    /// Process exit status to report for this failure
    ///
    /// A failed tool invocation propagates the tool's own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            RebbleError::Core(err) => err.exit_code(),
            RebbleError::CommandFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => exit_codes::FAILURE,
            },
            RebbleError::UnknownPlatform { .. } => exit_codes::CONFIG_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealines_core::Error;

    #[test]
    fn test_command_failed_propagates_exit_code() {
        let err = RebbleError::CommandFailed {
            command: "rebble install --emulator basalt".to_string(),
            exit_code: Some(42),
        };
        assert_eq!(err.exit_code(), 42);
        assert_eq!(
            err.to_string(),
            "`rebble install --emulator basalt` exited with status 42"
        );
    }

    #[test]
    fn test_signal_maps_to_failure() {
        let err = RebbleError::CommandFailed {
            command: "rebble build".to_string(),
            exit_code: None,
        };
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_core_errors_keep_their_exit_code() {
        let err: RebbleError = Error::manifest_not_found("package.json").into();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);

        let err: RebbleError = Error::command_not_found("rebble").into();
        assert_eq!(err.exit_code(), exit_codes::COMMAND_NOT_FOUND);
    }

    #[test]
    fn test_unknown_platform_message() {
        let err = RebbleError::UnknownPlatform {
            platform: "flint".to_string(),
            available: vec!["basalt".to_string(), "chalk".to_string()],
        };
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(
            err.to_string(),
            "Unknown platform 'flint' (manifest targets: basalt, chalk)"
        );
    }
}
