//! Merges CLI flags over file configuration into the effective run settings.

use download_tarball::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use download_tarball::index::{DEFAULT_INDEX_SUFFIX, DEFAULT_INDEX_URL};
use download_tarball::{FailurePolicy, IndexLocation, InstallSettings};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HttpTimeoutSettings {
    pub(crate) connect_secs: u64,
    pub(crate) read_secs: u64,
}

impl Default for HttpTimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) index: IndexLocation,
    pub(crate) install: InstallSettings,
    pub(crate) policy: FailurePolicy,
    pub(crate) http_timeouts: HttpTimeoutSettings,
    pub(crate) quiet: bool,
    pub(crate) log_level: &'static str,
}

pub(crate) fn resolve_settings(args: &Args, file_config: Option<&FileConfig>) -> RunSettings {
    let default_config = FileConfig::default();
    let file_config = file_config.unwrap_or(&default_config);

    let index = IndexLocation::new(
        file_config
            .index_url
            .clone()
            .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string()),
        file_config
            .index_suffix
            .clone()
            .unwrap_or_else(|| DEFAULT_INDEX_SUFFIX.to_string()),
    );

    let mut install = InstallSettings::default();
    if let Some(python) = &file_config.python {
        install.python.clone_from(python);
    }
    if let Some(user_install) = file_config.user_install {
        install.user_install = user_install;
    }

    let fail_fast = args.fail_fast || file_config.fail_fast.unwrap_or(false);

    let mut http_timeouts = HttpTimeoutSettings::default();
    if let Some(value) = file_config.connect_timeout_secs {
        http_timeouts.connect_secs = value;
    }
    if let Some(value) = file_config.read_timeout_secs {
        http_timeouts.read_secs = value;
    }

    let (verbose, quiet) = effective_verbosity(args, file_config.verbosity);

    RunSettings {
        index,
        install,
        policy: FailurePolicy::from_fail_fast(fail_fast),
        http_timeouts,
        quiet,
        log_level: resolve_default_log_level(verbose, quiet),
    }
}

/// CLI `-v`/`-q` win; otherwise the configured verbosity applies.
fn effective_verbosity(args: &Args, configured: Option<VerbositySetting>) -> (u8, bool) {
    if args.verbose > 0 || args.quiet {
        return (args.verbose, args.quiet);
    }
    match configured {
        None | Some(VerbositySetting::Default) => (0, false),
        Some(VerbositySetting::Verbose) => (1, false),
        Some(VerbositySetting::Debug) => (2, false),
        Some(VerbositySetting::Quiet) => (0, true),
    }
}

pub(crate) fn resolve_default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["download-tarball", "-p", "numpy"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_resolve_settings_defaults_without_config() {
        let settings = resolve_settings(&args(&[]), None);
        assert_eq!(settings.index, IndexLocation::default());
        assert_eq!(settings.install, InstallSettings::default());
        assert_eq!(settings.policy, FailurePolicy::Continue);
        assert_eq!(settings.http_timeouts, HttpTimeoutSettings::default());
        assert_eq!(settings.log_level, "info");
        assert!(!settings.quiet);
    }

    #[test]
    fn test_resolve_settings_applies_file_values() {
        let config = FileConfig {
            index_url: Some("http://127.0.0.1:9/project/".to_string()),
            python: Some("python3.12".to_string()),
            user_install: Some(false),
            fail_fast: Some(true),
            connect_timeout_secs: Some(3),
            read_timeout_secs: Some(9),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args(&[]), Some(&config));
        assert_eq!(
            settings.index.page_url("numpy"),
            format!("http://127.0.0.1:9/project/numpy{DEFAULT_INDEX_SUFFIX}")
        );
        assert_eq!(settings.install.python, "python3.12");
        assert!(!settings.install.user_install);
        assert_eq!(settings.policy, FailurePolicy::Abort);
        assert_eq!(settings.http_timeouts.connect_secs, 3);
        assert_eq!(settings.http_timeouts.read_secs, 9);
    }

    #[test]
    fn test_cli_fail_fast_overrides_file() {
        let config = FileConfig {
            fail_fast: Some(false),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args(&["--fail-fast"]), Some(&config));
        assert_eq!(settings.policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_configured_verbosity_applies_without_cli_flags() {
        let config = FileConfig {
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args(&[]), Some(&config));
        assert!(settings.quiet);
        assert_eq!(settings.log_level, "error");
    }

    #[test]
    fn test_cli_verbosity_overrides_configured() {
        let config = FileConfig {
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args(&["-v"]), Some(&config));
        assert!(!settings.quiet);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_resolve_default_log_level() {
        assert_eq!(resolve_default_log_level(0, false), "info");
        assert_eq!(resolve_default_log_level(1, false), "debug");
        assert_eq!(resolve_default_log_level(2, false), "trace");
        assert_eq!(resolve_default_log_level(2, true), "error");
    }
}
