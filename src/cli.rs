use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};

#[derive(Debug, Parser)]
#[command(
    name = "pf-periods",
    version,
    about = "Extract clock periods from an org-mode log and sync them to a document store"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a log file and report what would be stored, without touching the store
    Check {
        /// Path to the org-mode log file
        file: PathBuf,
    },
    /// Parse a log file and upsert the resulting period records into the store
    Sync {
        /// Path to the org-mode log file
        file: PathBuf,
        /// Resync even if the source file is unchanged since the last run
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration, sync state, and active environment overrides
    Status,
    /// Confirm the store is reachable and its contents cover the last sync
    Verify,
}

fn render(report: CommandReport) -> Result<()> {
    println!("command={} ok={}", report.command, report.ok);
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    if report.ok {
        Ok(())
    } else {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Check { file } => commands::check::run(&file)?,
        Command::Sync { file, force } => commands::sync::run(&commands::sync::SyncOptions { file, force })?,
        Command::Status => commands::status::run()?,
        Command::Verify => commands::verify::run()?,
    };
    render(report)
}
