//! horario CLI.
//!
//! Loads a dataset directory, builds the weekly timetables, and writes the
//! group and teacher documents.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use horario::io::{self, Dataset};
use horario::models::CompactionStrategy;
use horario::scheduler::RunKpi;

#[derive(Parser)]
#[command(
    name = "horario",
    version,
    about = "Weekly timetables for a two-shift school",
    after_help = "EXAMPLES:\n  \
                  horario --data ./data\n  \
                  horario --data ./data --out ./results --compaction swap -v\n\n\
                  The data directory must contain subjects.json, groups.json,\n\
                  teachers.json and config.json."
)]
struct Cli {
    /// Directory holding the input documents
    #[arg(short, long)]
    data: PathBuf,

    /// Output directory (defaults to the data directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Gap handling, overriding config.json
    #[arg(short, long, value_enum)]
    compaction: Option<Compaction>,

    /// Exit with an error when any requirement is unmet or the views disagree
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Compaction {
    FirstFit,
    Swap,
}

impl From<Compaction> for CompactionStrategy {
    fn from(value: Compaction) -> Self {
        match value {
            Compaction::FirstFit => CompactionStrategy::FirstFit,
            Compaction::Swap => CompactionStrategy::Swap,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    horario::logging::init(cli.verbose);

    let mut dataset = Dataset::load_dir(&cli.data)
        .with_context(|| format!("failed to load dataset from {}", cli.data.display()))?;
    if let Some(compaction) = cli.compaction {
        dataset.config.compaction = compaction.into();
    }

    let report = dataset.run().context("scheduling failed")?;

    let out = cli.out.unwrap_or_else(|| cli.data.clone());
    let written = io::write_results(&report, &out)
        .with_context(|| format!("failed to write results to {}", out.display()))?;
    for path in &written {
        info!(path = %path.display(), "wrote");
    }

    let kpi = RunKpi::calculate(&report);
    println!(
        "{} groups, {} teachers: {}/{} hours placed ({:.1}%), {} holes, {} issues, {} violations",
        report.groups.len(),
        report.teachers.len(),
        kpi.hours_placed,
        kpi.hours_required,
        kpi.coverage * 100.0,
        kpi.holes,
        report.issues.len(),
        report.coherence.violations.len()
    );

    if !report.is_complete() {
        warn!("schedule is partial; see run_summary.json");
        if cli.strict {
            bail!(
                "{} issues and {} coherence violations",
                report.issues.len(),
                report.coherence.violations.len()
            );
        }
    }
    Ok(())
}
