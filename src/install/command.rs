//! Install command construction.

use std::fmt;
use std::path::Path;

use crate::archive::BUILD_SCRIPT;

/// Dependency manifest installed before the build script, when present.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Interpreter and flags used to build the install commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    /// Python interpreter to invoke.
    pub python: String,
    /// Pass `--user` to pip and the build script.
    pub user_install: bool,
}

impl Default for InstallSettings {
    fn default() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::posix()
        }
    }
}

impl InstallSettings {
    /// POSIX template: `python3 setup.py install --user`.
    #[must_use]
    pub fn posix() -> Self {
        Self {
            python: "python3".to_string(),
            user_install: true,
        }
    }

    /// Windows template: `python setup.py install`.
    #[must_use]
    pub fn windows() -> Self {
        Self {
            python: "python".to_string(),
            user_install: false,
        }
    }
}

/// A single program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Program to spawn.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl InstallCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        }
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Ordered commands to run inside an extracted project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Commands in execution order.
    pub commands: Vec<InstallCommand>,
}

impl InstallPlan {
    /// Plans the install for the project at `root`.
    ///
    /// A `pip install -r requirements.txt` step comes first when the
    /// requirements file exists at the root; the build script install always
    /// follows.
    #[must_use]
    pub fn for_root(root: &Path, settings: &InstallSettings) -> Self {
        let user_flag: &[&str] = if settings.user_install {
            &["--user"]
        } else {
            &[]
        };
        let mut commands = Vec::with_capacity(2);

        if root.join(REQUIREMENTS_FILE).is_file() {
            let mut args = vec!["-m", "pip", "install", "-r", REQUIREMENTS_FILE];
            args.extend_from_slice(user_flag);
            commands.push(InstallCommand::new(&settings.python, &args));
        }

        let mut args = vec![BUILD_SCRIPT, "install"];
        args.extend_from_slice(user_flag);
        commands.push(InstallCommand::new(&settings.python, &args));

        Self { commands }
    }

    /// Returns true if a dependency install step is planned.
    #[must_use]
    pub fn installs_requirements(&self) -> bool {
        self.commands.len() > 1
    }
}
