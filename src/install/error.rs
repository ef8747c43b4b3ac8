//! Error types for install command execution.

use thiserror::Error;

/// Errors that can occur while running install commands.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The command could not be started (missing interpreter, permissions).
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's output or waiting for it failed.
    #[error("failed to read output of `{command}`: {source}")]
    Output {
        /// Rendered command line.
        command: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully.
    #[error("`{command}` failed with {}", describe_exit(.code))]
    BuildFailed {
        /// Rendered command line.
        command: String,
        /// Exit code; `None` when terminated by a signal.
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
