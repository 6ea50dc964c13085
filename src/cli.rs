//! Command-line interface module for folder-organizer.
//!
//! This module handles:
//! - Argument parsing
//! - Filter configuration loading
//! - Confirmation before touching the disk
//! - Progress and summary output

use crate::config::FilterConfig;
use crate::confirm::Confirmation;
use crate::organizer::{OrganizeReport, Organizer};
use crate::output::OutputFormatter;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Sort the subdirectories of a folder into A-E, F-J, K-O, P-T, U-Z and Other.
#[derive(Debug, Clone, Parser)]
#[command(name = "folder-organizer", version, about)]
pub struct Args {
    /// Directory to organize (defaults to the current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Show where folders would go without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Filter configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The confirmation prompt must not end up in JSON written to stdout.
    pub fn prompt_on_stderr(&self) -> bool {
        self.json
    }
}

/// Options for a single run, with the root already resolved.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl RunOptions {
    /// Resolves the root from the arguments, using `current_dir` when no
    /// path was given.
    pub fn from_args(args: &Args, current_dir: &Path) -> Self {
        Self {
            root: args
                .path
                .clone()
                .unwrap_or_else(|| current_dir.to_path_buf()),
            dry_run: args.dry_run,
            config_path: args.config.clone(),
            json: args.json,
        }
    }
}

/// Runs the organizer after asking `confirmation`.
///
/// Returns `Ok(None)` when the operator declines. Per-folder failures are in
/// the report; only setup failures come back as errors.
pub fn run_cli(
    options: &RunOptions,
    confirmation: &mut dyn Confirmation,
) -> anyhow::Result<Option<OrganizeReport>> {
    let question = if options.dry_run {
        format!(
            "folder-organizer will simulate organizing the folder:\n{}\n\nContinue?",
            options.root.display()
        )
    } else {
        format!(
            "folder-organizer will now organize the folder:\n{}\n\nContinue?",
            options.root.display()
        )
    };
    if !confirmation
        .confirm(&question)
        .context("Failed to read confirmation")?
    {
        info!("declined by operator");
        return Ok(None);
    }

    let filter = FilterConfig::load(options.config_path.as_deref(), &options.root)
        .context("Error loading configuration")?
        .compile()
        .context("Error compiling filters")?;

    let organizer = Organizer::new()
        .with_filter(filter)
        .dry_run(options.dry_run);

    let report = if options.json {
        organizer.run(&options.root)
    } else {
        println!();
        let progress = OutputFormatter::create_spinner();
        let report = organizer.run_with_progress(&options.root, |outcome| {
            progress.println(OutputFormatter::outcome_line(outcome));
            progress.inc(1);
        });
        progress.finish_and_clear();
        report
    };
    let report = report.with_context(|| format!("Could not organize {}", options.root.display()))?;

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        OutputFormatter::summary(&report);
    }

    Ok(Some(report))
}
