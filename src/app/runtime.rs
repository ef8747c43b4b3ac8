use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use download_tarball::{
    HttpClient, Pipeline, ProcessInstaller, RunReport, ScratchDir, read_manifest, run_all,
};
use tracing::{debug, info, warn};

use crate::app::{config_runtime, exit_handler, terminal};
use crate::cli::Args;
use crate::{ProcessExit, app_config, output};

pub(crate) async fn run_installer() -> Result<ProcessExit> {
    let args = Args::parse();

    let loaded = app_config::load_default_file_config()?;
    let settings = config_runtime::resolve_settings(&args, loaded.config.as_ref());

    let no_color = terminal::is_no_color_requested(args.no_color);
    terminal::init_tracing(settings.log_level, no_color);

    debug!(?args, "CLI arguments parsed");
    if let Some(config) = &loaded.config
        && let Some(path) = &loaded.path
    {
        debug!(
            config = %path.display(),
            verbosity = config
                .verbosity
                .map_or("unset", app_config::VerbositySetting::as_str),
            "Configuration file loaded"
        );
    }

    let packages = if let Some(package) = &args.package {
        vec![package.clone()]
    } else if let Some(path) = &args.requirements {
        read_manifest(path).with_context(|| {
            format!("Could not load requirements file '{}'", path.display())
        })?
    } else {
        bail!("Either --package or --requirements is required");
    };

    if packages.is_empty() {
        info!("No packages to install");
        return Ok(ProcessExit::Success);
    }

    let scratch = ScratchDir::new().context("Failed to create scratch directory")?;
    let show_progress = terminal::should_show_progress(
        io::stderr().is_terminal(),
        settings.quiet,
        terminal::is_dumb_terminal(),
    );
    let client = HttpClient::new_with_timeouts(
        settings.http_timeouts.connect_secs,
        settings.http_timeouts.read_secs,
    )
    .with_progress(show_progress);
    let pipeline = Pipeline::new(
        client,
        settings.index.clone(),
        Arc::new(ProcessInstaller::new()),
        settings.install.clone(),
    );

    info!(
        packages = packages.len(),
        policy = ?settings.policy,
        scratch = %scratch.path().display(),
        "Starting install"
    );

    let report: Option<RunReport> = tokio::select! {
        report = run_all(&pipeline, &packages, scratch.path(), settings.policy) => Some(report),
        () = wait_for_interrupt() => None,
    };

    if report.is_none() {
        pipeline.extract_gate().cancel_and_wait().await;
    }
    // Failures are logged inside cleanup; the run outcome stands either way.
    let _ = scratch.cleanup();

    let Some(report) = report else {
        warn!("Interrupted, remaining packages were not installed");
        return Ok(ProcessExit::Failure);
    };

    output::print_summary(&report);

    Ok(exit_handler::determine_exit_outcome(
        report.installed_count(),
        report.failed_count() + report.skipped.len(),
    ))
}

/// Resolves on Ctrl-C. Never resolves if the signal cannot be installed.
async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!(error = %e, "Interrupt handler unavailable");
        std::future::pending::<()>().await;
    }
}
