//! Child process execution for install plans.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, instrument};

use super::command::{InstallCommand, InstallPlan};
use super::error::InstallError;

/// Runs an install plan inside an extracted project root.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Executes every command of `plan` in order with `root` as working
    /// directory, stopping at the first failure.
    async fn install(&self, plan: &InstallPlan, root: &Path) -> Result<(), InstallError>;
}

/// Spawns real child processes and relays their stdout to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInstaller;

impl ProcessInstaller {
    /// Creates a process installer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, plan: &InstallPlan, root: &Path) -> Result<(), InstallError> {
        for command in &plan.commands {
            run_command(command, root, |line| println!("{line}")).await?;
        }
        Ok(())
    }
}

/// Spawns `command` in `root`, passing each stdout line to `on_line`.
///
/// Stderr is inherited so build errors reach the terminal unmodified.
///
/// # Errors
///
/// Returns [`InstallError::Spawn`] if the process cannot be started,
/// [`InstallError::Output`] if its output cannot be read, and
/// [`InstallError::BuildFailed`] on a non-zero exit.
#[instrument(skip(root, on_line), fields(command = %command))]
pub async fn run_command<F>(
    command: &InstallCommand,
    root: &Path,
    mut on_line: F,
) -> Result<(), InstallError>
where
    F: FnMut(&str) + Send,
{
    info!(cwd = %root.display(), "running");
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| InstallError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if let Some(stdout) = child.stdout.take() {
        // Build output is not guaranteed to be UTF-8.
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| InstallError::Output {
                    command: command.to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            on_line(line.trim_end_matches(['\n', '\r']));
        }
    }

    let status = child.wait().await.map_err(|source| InstallError::Output {
        command: command.to_string(),
        source,
    })?;
    debug!(?status, "process exited");

    if status.success() {
        Ok(())
    } else {
        Err(InstallError::BuildFailed {
            command: command.to_string(),
            code: status.code(),
        })
    }
}
