//! CLI entry point for the download-tarball tool.

mod app;
mod app_config;
mod cli;
mod output;

/// Process outcome mapped to the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every package installed.
    Success,
    /// Some packages installed, some did not.
    Partial,
    /// Nothing installed, interrupted, or a fatal error.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

#[tokio::main]
async fn main() {
    let exit = match app::runtime::run_installer().await {
        Ok(exit) => exit,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ProcessExit::Failure
        }
    };
    std::process::exit(exit.code());
}
