//! Rehearse - rehearsal job selection CLI
//!
//! The `rehearse-diff` command compares two working copies of the release
//! repository and reports which build configurations and jobs the candidate
//! revision requires rehearsing.
//!
//! ## Outputs
//!
//! - a JSON selection report (`--output`, or stdout)
//! - a markdown summary for PR comments (`--summary-md`)

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;

use rehearse_core::{
    emit_load_error, emit_selection_events, emit_selection_summary, emit_snapshot_loaded,
    select_rehearsals, write_selection_report_json, write_selection_summary_md, ClusterProfile,
    SelectionReport, SelectionSpan, Snapshot,
};

#[derive(Parser, Debug)]
#[command(name = "rehearse-diff")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Select CI jobs to rehearse for a release repository change", long_about = None)]
struct Cli {
    /// Working copy of the release repository at the baseline revision
    #[arg(long, env = "REHEARSE_MASTER_PATH")]
    master_path: PathBuf,

    /// Working copy of the release repository at the candidate revision
    #[arg(long, env = "REHEARSE_CANDIDATE_PATH")]
    candidate_path: PathBuf,

    /// Cluster profile touched by the change (repeatable)
    #[arg(long = "cluster-profile")]
    cluster_profiles: Vec<ClusterProfile>,

    /// Write the JSON selection report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a markdown summary here
    #[arg(long)]
    summary_md: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    rehearse_core::init_tracing(cli.json, level);

    let report = cmd_select(&cli)?;
    if cli.output.is_none() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn load_snapshot(revision: &str, path: &Path) -> Result<Snapshot> {
    let snapshot = Snapshot::load(path)
        .inspect_err(|e| emit_load_error(revision, e))
        .with_context(|| format!("Failed to load {} revision from {:?}", revision, path))?;
    emit_snapshot_loaded(
        revision,
        snapshot.configs.len(),
        snapshot.jobs.presubmits.len(),
        snapshot.jobs.postsubmits.len(),
        snapshot.jobs.periodics.len(),
    );
    Ok(snapshot)
}

/// Load both revisions, compute the selection and write requested artifacts.
fn cmd_select(cli: &Cli) -> Result<SelectionReport> {
    let master_label = cli.master_path.display().to_string();
    let candidate_label = cli.candidate_path.display().to_string();
    let _span = SelectionSpan::enter(&master_label, &candidate_label);

    let master = load_snapshot("master", &cli.master_path)?;
    let candidate = load_snapshot("candidate", &cli.candidate_path)?;

    let selection = select_rehearsals(&master, &candidate, &cli.cluster_profiles);
    emit_selection_events(&selection.events);
    emit_selection_summary(&selection);

    let report = SelectionReport::from_selection(&selection, Utc::now());
    if let Some(path) = &cli.output {
        write_selection_report_json(path, &report)?;
    }
    if let Some(path) = &cli.summary_md {
        write_selection_summary_md(path, &report)?;
    }
    Ok(report)
}
