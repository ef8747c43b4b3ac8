//! Installing an extracted project with its build script.
//!
//! An [`InstallPlan`] lists one or two commands: an optional dependency
//! install (only when `requirements.txt` exists at the project root) followed
//! by the OS-specific build script install. An [`Installer`] executes the
//! plan; [`ProcessInstaller`] does so with real child processes.

mod command;
mod error;
mod runner;

pub use command::{InstallCommand, InstallPlan, InstallSettings, REQUIREMENTS_FILE};
pub use error::InstallError;
pub use runner::{Installer, ProcessInstaller, run_command};
