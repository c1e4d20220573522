use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::domain::ProwJob;
use crate::selection::RehearsalSelection;

/// Schema version of the persisted selection report.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// A selected job with the repository it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectedJobArtifact {
    pub repo: String,
    pub name: String,
}

/// Counts section persisted in the selection report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionSummaryArtifact {
    pub changed_configs: usize,
    pub affected_tests: usize,
    pub presubmits: usize,
    pub postsubmits: usize,
    pub periodics: usize,
}

/// Canonical selection report written for CI and PR reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 over the sorted selected job names, stable across runs.
    pub fingerprint: String,
    pub summary: SelectionSummaryArtifact,
    pub changed_configs: Vec<String>,
    /// `{config key}:{test}` entries.
    pub affected_tests: Vec<String>,
    pub presubmits: Vec<SelectedJobArtifact>,
    pub postsubmits: Vec<SelectedJobArtifact>,
    pub periodics: Vec<String>,
}

impl SelectionReport {
    pub fn from_selection(selection: &RehearsalSelection, generated_at: DateTime<Utc>) -> Self {
        let changed_configs: Vec<String> = selection.changed_configs.keys().cloned().collect();
        let affected_tests: Vec<String> = selection
            .affected_tests
            .iter()
            .flat_map(|(key, tests)| tests.iter().map(move |test| format!("{}:{}", key, test)))
            .collect();

        let mut presubmits: Vec<SelectedJobArtifact> = selection
            .presubmits
            .jobs()
            .map(|(repo, job)| SelectedJobArtifact {
                repo: repo.to_string(),
                name: job.name().to_string(),
            })
            .collect();
        presubmits.sort();
        let mut postsubmits: Vec<SelectedJobArtifact> = selection
            .postsubmits
            .iter()
            .map(|p| SelectedJobArtifact {
                repo: p.info.org_repo(),
                name: p.job.name().to_string(),
            })
            .collect();
        postsubmits.sort();
        let periodics: Vec<String> = selection.periodics.keys().cloned().collect();

        let fingerprint = selection_fingerprint(
            presubmits
                .iter()
                .chain(postsubmits.iter())
                .map(|job| job.name.as_str())
                .chain(periodics.iter().map(String::as_str)),
        );

        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at,
            fingerprint,
            summary: SelectionSummaryArtifact {
                changed_configs: changed_configs.len(),
                affected_tests: affected_tests.len(),
                presubmits: presubmits.len(),
                postsubmits: postsubmits.len(),
                periodics: periodics.len(),
            },
            changed_configs,
            affected_tests,
            presubmits,
            postsubmits,
            periodics,
        }
    }
}

/// Hex SHA-256 over the sorted, newline-terminated job names.
pub fn selection_fingerprint<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_unstable();
    let mut hasher = Sha256::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Write the selection report in pretty JSON format.
pub fn write_selection_report_json(path: &Path, report: &SelectionReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize selection report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Render markdown summary for PR/comment output.
pub fn render_selection_summary_md(report: &SelectionReport) -> String {
    let mut out = String::new();
    out.push_str("# Rehearsal Selection\n\n");
    out.push_str(&format!(
        "- changed configs: {}\n- affected tests: {}\n- presubmits: {}\n- postsubmits: {}\n- periodics: {}\n\n",
        report.summary.changed_configs,
        report.summary.affected_tests,
        report.summary.presubmits,
        report.summary.postsubmits,
        report.summary.periodics
    ));

    if !report.changed_configs.is_empty() {
        out.push_str("## Changed Configs\n");
        for key in &report.changed_configs {
            out.push_str(&format!("- `{}`\n", key));
        }
        out.push('\n');
    }

    let jobs = report
        .presubmits
        .iter()
        .chain(report.postsubmits.iter())
        .map(|job| format!("- `{}` ({})\n", job.name, job.repo))
        .chain(report.periodics.iter().map(|name| format!("- `{}`\n", name)));
    let mut jobs = jobs.peekable();
    if jobs.peek().is_some() {
        out.push_str("## Jobs\n");
        jobs.for_each(|line| out.push_str(&line));
        out.push('\n');
    }

    out.push_str(&format!("fingerprint: `{}`\n", report.fingerprint));
    out
}

/// Write the markdown summary.
pub fn write_selection_summary_md(path: &Path, report: &SelectionReport) -> Result<()> {
    let md = render_selection_summary_md(report);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
