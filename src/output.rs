//! End-of-run summary shown on stdout.

use std::path::Path;

use homebrew_catalog::ScrapeReport;
use tracing::{info, warn};

/// Returns the summary lines printed after the catalog is written.
pub fn summary_lines(report: &ScrapeReport, output: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("Catalog saved to {}", output.display()),
        format!("Items with download link: {}", report.cataloged()),
    ];
    if !report.skipped_no_download.is_empty() || report.failed() > 0 {
        lines.push(format!(
            "Skipped without download: {}, failed: {}",
            report.skipped_no_download.len(),
            report.failed()
        ));
    }

    let stats = report.category_stats();
    if !stats.is_empty() {
        lines.push("Items per category:".to_string());
        lines.extend(
            stats
                .iter()
                .map(|(category, count)| format!("  {category}: {count}")),
        );
    }
    lines
}

/// Logs the run totals and prints the summary unless `quiet`.
pub fn print_summary(report: &ScrapeReport, output: &Path, quiet: bool) {
    info!(
        cataloged = report.cataloged(),
        skipped = report.skipped_no_download.len(),
        failed = report.failed(),
        enumerated = report.enumerated,
        "Run summary"
    );
    if let Some(error) = &report.enumeration_error {
        warn!(error = %error, "Collection listing failed; catalog is empty");
    } else if report.listing_truncated {
        warn!("Collection listing was truncated; raise --rows or --max-pages");
    }

    if quiet {
        return;
    }
    for line in summary_lines(report, output) {
        println!("{line}");
    }
}
