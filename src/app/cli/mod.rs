//! CLI Adapter.

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::error;

use crate::app::api::{self, RunMode, RunOptions, RunResult};
use crate::app::logging;
use crate::domain::AppError;

/// Exit code when a sanity check stopped the run.
pub const EXIT_SUSPICIOUS: i32 = 2;
/// Exit code when some individual deletions failed.
pub const EXIT_PARTIAL: i32 = 3;

#[derive(Parser)]
#[command(name = "unmerged-cleaner")]
#[command(version)]
#[command(
    about = "List and delete old, unprotected entries from the unmerged storage area",
    long_about = None
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Reference time for age comparisons, in unix seconds (default: now)
    #[arg(long, value_name = "UNIX_SECONDS", allow_negative_numbers = true)]
    now: Option<i64>,
    /// Override the deletion list location
    #[arg(long, value_name = "FILE")]
    deletion_file: Option<PathBuf>,
    /// Only write the deletion list for review
    #[arg(long, conflicts_with = "execute_only")]
    scan_only: bool,
    /// Only delete the entries of an existing deletion list
    #[arg(long)]
    execute_only: bool,
    /// Log debug details
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mode = if cli.scan_only {
        RunMode::ScanOnly
    } else if cli.execute_only {
        RunMode::ExecuteOnly
    } else {
        RunMode::Full
    };
    let now = cli.now.unwrap_or_else(|| Utc::now().timestamp());
    let options =
        RunOptions { mode, now, config_path: cli.config, deletion_file: cli.deletion_file };

    let exit_code = match api::run(options) {
        Ok(result) => report(&result),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for(error: &AppError) -> i32 {
    match error {
        AppError::SuspiciousConditions(_) => EXIT_SUSPICIOUS,
        _ => 1,
    }
}

fn report(result: &RunResult) -> i32 {
    if let Some(scan) = &result.scan {
        println!(
            "✅ Listed {} entries ({} bytes) in {}",
            scan.candidates.len(),
            scan.total_size(),
            scan.list_path.display()
        );
        if !scan.errors.is_empty() {
            println!("⚠️  {} entries could not be inspected and were kept", scan.errors.len());
        }
    }

    let Some(execution) = &result.execution else {
        return 0;
    };
    println!(
        "✅ Deleted {} entries and {} emptied directories",
        execution.deleted.len(),
        execution.pruned.len()
    );
    if execution.is_clean() {
        return 0;
    }

    println!("⚠️  {} deletions failed:", execution.failures.len());
    for failure in &execution.failures {
        println!("  • {}", failure);
    }
    EXIT_PARTIAL
}
