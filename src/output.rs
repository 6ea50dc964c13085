//! Output formatting and styling module.
//!
//! All operator-facing text goes through here: the banner, colored status
//! lines, the progress bar shown while folders move, and the final summary.
//! Diagnostics go through `tracing` instead.

use crate::organizer::{FolderOutcome, OrganizeReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the name and version line shown before every run.
    pub fn banner(version: &str) {
        println!("{} version {}\n", "folder-organizer".bold(), version);
    }

    /// Creates a spinner counting processed folders.
    ///
    /// Falls back to the default style if the template is rejected.
    pub fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {pos} folders processed {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// One progress line per folder, printed above the progress bar.
    pub fn outcome_line(outcome: &FolderOutcome) -> String {
        match outcome {
            FolderOutcome::Moved {
                source, bucket, ..
            } => format!("{} {} → {}/", "✓".green(), source.display(), bucket),
            FolderOutcome::Planned {
                source, bucket, ..
            } => format!(
                "{} {} → {}/",
                "[DRY RUN]".yellow(),
                source.display(),
                bucket
            ),
            FolderOutcome::Skipped { path, reason } => {
                format!("{} Skipping {}: {}", "⚠".yellow(), path.display(), reason)
            }
            FolderOutcome::Failed { source, error, .. } => format!(
                "{} Error moving {}: {}",
                "✗".red(),
                source.display(),
                error
            ),
        }
    }

    /// Prints the per-bucket table, failures, skips and the elapsed time.
    pub fn summary(report: &OrganizeReport) {
        Self::header(if report.dry_run {
            "DRY RUN SUMMARY"
        } else {
            "SUMMARY"
        });

        let counts = report.bucket_counts();
        let width = counts
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Bucket".len());

        println!(
            "{:<width$} | {}",
            "Bucket".bold(),
            "Folders".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 12));
        for (bucket, count) in &counts {
            println!(
                "{:<width$} | {} {}",
                bucket,
                count.to_string().green(),
                folder_word(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 12));
        println!(
            "{:<width$} | {} of {} {}",
            "Total".bold(),
            report.succeeded().to_string().green().bold(),
            report.processed(),
            folder_word(report.processed()),
            width = width
        );

        let failures = report.failures();
        if !failures.is_empty() {
            Self::header("FAILED");
            for (path, error) in &failures {
                Self::error(&format!("{}: {}", path.display(), error));
            }
        }

        let skipped = report.skipped();
        if !skipped.is_empty() {
            Self::header("SKIPPED");
            for (path, reason) in &skipped {
                Self::warning(&format!("{}: {}", path.display(), reason));
            }
        }

        println!();
        if report.is_complete_success() {
            Self::success(&format!("Done! (Completed in {})", format_elapsed(report.elapsed)));
        } else {
            Self::warning(&format!(
                "Done with errors. (Completed in {})",
                format_elapsed(report.elapsed)
            ));
        }
    }
}

fn folder_word(count: usize) -> &'static str {
    if count == 1 { "folder" } else { "folders" }
}

/// Seconds, rounded to two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
