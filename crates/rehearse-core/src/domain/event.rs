//! Selection events.
//!
//! Every classification decision made by the diff layer is returned as a
//! [`SelectionEvent`] instead of being logged in place. Callers decide whether to
//! log them (see [`crate::obs`]), report them, or ignore them.

use serde::{Deserialize, Serialize};

/// What kind of entity an event is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Config,
    Presubmit,
    Postsubmit,
    Periodic,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Config => "config",
            SubjectKind::Presubmit => "presubmit",
            SubjectKind::Postsubmit => "postsubmit",
            SubjectKind::Periodic => "periodic",
        }
    }
}

/// Why an entity was selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionReason {
    /// Configuration does not exist in the baseline.
    NewConfig,
    /// A non-test part of the configuration changed; every test is affected.
    ConfigChanged,
    /// Only this test's definition changed.
    TestChanged { test: String },
    /// No baseline kubernetes-agent job with this name.
    NewJob,
    /// Pod spec differs from the baseline.
    SpecChanged,
    /// Baseline job was optional, candidate is not.
    NoLongerOptional,
    /// Baseline job ran conditionally, candidate always runs.
    NowAlwaysRun,
    /// Execution cluster moved.
    ClusterChanged { from: String, to: String },
    /// Image-build postsubmit of a changed configuration.
    ImagesForConfig { config: String },
    /// Presubmit generated from a changed configuration.
    TestForConfig { config: String, test: String },
    /// Presubmit mounts a changed cluster profile.
    ClusterProfile { profile: String },
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionReason::NewConfig => f.write_str("new config"),
            SelectionReason::ConfigChanged => f.write_str("config changed"),
            SelectionReason::TestChanged { test } => write!(f, "test {} changed", test),
            SelectionReason::NewJob => f.write_str("new job"),
            SelectionReason::SpecChanged => f.write_str("spec changed"),
            SelectionReason::NoLongerOptional => f.write_str("no longer optional"),
            SelectionReason::NowAlwaysRun => f.write_str("now always runs"),
            SelectionReason::ClusterChanged { from, to } => {
                write!(f, "cluster changed from {} to {}", from, to)
            }
            SelectionReason::ImagesForConfig { config } => {
                write!(f, "images job for config {}", config)
            }
            SelectionReason::TestForConfig { config, test } => {
                write!(f, "test {} of config {}", test, config)
            }
            SelectionReason::ClusterProfile { profile } => {
                write!(f, "uses cluster profile {}", profile)
            }
        }
    }
}

/// A single classification decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionEvent {
    pub kind: SubjectKind,
    /// Configuration key or job name.
    pub subject: String,
    /// `org/repo` for jobs indexed by repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    pub reason: SelectionReason,
}

impl SelectionEvent {
    pub fn config(key: impl Into<String>, reason: SelectionReason) -> Self {
        Self {
            kind: SubjectKind::Config,
            subject: key.into(),
            repo: None,
            reason,
        }
    }

    pub fn job(
        kind: SubjectKind,
        repo: Option<&str>,
        name: impl Into<String>,
        reason: SelectionReason,
    ) -> Self {
        Self {
            kind,
            subject: name.into(),
            repo: repo.map(str::to_string),
            reason,
        }
    }

    /// One-line human summary.
    pub fn message(&self) -> &'static str {
        match (self.kind, &self.reason) {
            (SubjectKind::Config, SelectionReason::NewConfig) => "New ci-operator config file",
            (SubjectKind::Config, _) => "ci-operator config file changed",
            _ => "Job has been chosen for rehearsal",
        }
    }
}
