//! CLI output formatting for the end-of-run summary.

use std::collections::BTreeMap;

use download_tarball::{FailureKind, RunReport};

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Renders the run summary. Failure messages are never truncated.
pub(crate) fn render_summary_lines(report: &RunReport, width: usize) -> Vec<String> {
    let mut lines = vec![truncate_to_width(
        &format!(
            "Installed {} of {} package(s)",
            report.installed_count(),
            report.total()
        ),
        width,
    )];

    for installed in &report.installed {
        lines.push(truncate_to_width(
            &format!("  ✓ {} ({})", installed.package, installed.kind),
            width,
        ));
    }

    if !report.failed.is_empty() {
        let mut grouped: BTreeMap<FailureKind, usize> = BTreeMap::new();
        for failure in &report.failed {
            *grouped.entry(failure.kind).or_insert(0) += 1;
        }
        let categories: Vec<String> = grouped
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        lines.push(truncate_to_width(
            &format!("Failed ({})", categories.join(", ")),
            width,
        ));
        for failure in &report.failed {
            lines.push(truncate_to_width(
                &format!("  ✗ {} [{}]", failure.package, failure.kind),
                width,
            ));
            lines.push(format!("    {}", failure.message));
        }
    }

    if !report.skipped.is_empty() {
        lines.push(truncate_to_width(
            &format!("Skipped: {}", report.skipped.join(", ")),
            width,
        ));
    }

    lines
}

pub(crate) fn print_summary(report: &RunReport) {
    for line in render_summary_lines(report, terminal_width()) {
        println!("{line}");
    }
}
