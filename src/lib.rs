//! dupe-sidecar - duplicate-set resolution with provenance sidecars
//!
//! Consumes the duplicate sets reported by `jdupes`, keeps one copy per set
//! according to directory priority, deletes the rest, and records every
//! deleted path in a sidecar file next to the surviving copy.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use yansi::Paint;

use crate::actions::{FsSidecarStore, NoopObserver, ResolutionObserver, Resolver, RunSummary};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::PriorityOrder;
use crate::error::ExitCode;
use crate::output::DryRunReport;
use crate::progress::GroupProgress;
use crate::scanner::{DuplicateScanner, JdupesScanner, ReportFileScanner};

/// Run the application with parsed arguments.
///
/// Fatal problems (configuration, scanner, report) are returned as errors
/// before anything is modified. Per-file problems are logged and reflected
/// in the returned exit code.
///
/// # Errors
///
/// Returns an error if configuration is invalid or duplicate sets cannot be
/// obtained.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    log::debug!("Log level: {}", logging::current_level_name());
    if cli.no_color {
        yansi::disable();
    }

    let mut config =
        Config::load_from_path(cli.config.as_deref()).context("Failed to load configuration")?;
    config.merge_cli(&cli);
    let extension = config
        .sidecar_extension()
        .context("Invalid sidecar extension")?;
    let show_progress = config.show_progress && !cli.quiet;

    let scanner: Box<dyn DuplicateScanner> = match &cli.from_report {
        Some(report) => Box::new(ReportFileScanner::new(report)),
        None => Box::new(JdupesScanner::new(config.scanner_config(show_progress)?)),
    };

    print_banner(&cli);
    if !cli.dry_run && !cli.yes && !confirm_proceed()? {
        if !cli.quiet {
            println!("Operation cancelled by user.");
        }
        return Ok(ExitCode::Success);
    }

    let groups = scanner
        .scan(&cli.directories)
        .context("Failed to obtain duplicate sets")?;
    if groups.is_empty() {
        log::info!("No duplicates found.");
    }
    log::info!("Processing {} duplicate sets.", groups.len());

    let resolver = Resolver::new(
        PriorityOrder::new(&cli.directories),
        config.resolve_options(cli.dry_run),
        FsSidecarStore::new(extension),
    );

    let mut report = DryRunReport::new();
    let mut noop = NoopObserver;
    let observer: &mut dyn ResolutionObserver = if cli.dry_run {
        &mut report
    } else {
        &mut noop
    };

    let progress = GroupProgress::new(groups.len(), show_progress);
    let mut summary = RunSummary::default();
    for group in &groups {
        summary.record(&resolver.resolve(group, &mut *observer));
        progress.inc();
    }
    progress.finish();

    if cli.dry_run {
        match report.save(&config.dry_run_output) {
            Ok(()) => log::info!(
                "Dry run completed. Report written to {}",
                config.dry_run_output.display()
            ),
            Err(e) => log::error!("{}", e),
        }
    }

    log::info!("{}", summary.summary());
    Ok(exit_code_for(&summary))
}

/// Exit code for a completed run.
#[must_use]
pub fn exit_code_for(summary: &RunSummary) -> ExitCode {
    if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if summary.groups_resolved == 0 {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

fn print_banner(cli: &Cli) {
    if cli.dry_run {
        log::info!("Starting in dry run mode.");
        if !cli.quiet {
            println!(
                "{}",
                "Dry run mode: No files will be deleted or modified.".green()
            );
        }
    } else {
        log::info!("Starting in normal mode.");
        if !cli.quiet {
            println!(
                "{}",
                "Normal mode: Files may be deleted and sidecar files created."
                    .yellow()
                    .bold()
            );
        }
    }
}

fn confirm_proceed() -> io::Result<bool> {
    print!("Do you want to proceed? [y/N]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Whether a prompt answer means "yes".
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
