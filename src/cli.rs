//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Install Python packages from their source archives.
///
/// Each package's index page is scanned for a `.tar.gz` (preferred) or
/// `.zip` source archive, which is downloaded, unpacked, and installed with
/// its `setup.py`.
#[derive(Parser, Debug)]
#[command(name = "download-tarball")]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["package", "requirements"])
))]
pub struct Args {
    /// Name of a single package to install
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// Requirements file listing one package per line
    #[arg(short, long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Stop at the first package that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
