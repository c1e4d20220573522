//! Rehearse Core Library
//!
//! Decides which CI jobs must be rehearsed when a change to the release
//! repository touches build configurations or job definitions.

pub mod diff;
pub mod domain;
pub mod loader;
pub mod naming;
pub mod obs;
pub mod reporting;
pub mod selection;
pub mod telemetry;

pub use domain::{
    is_empty_value, periodics_by_name, Agent, ByFilename, ConfigWithInfo, Configuration, Info,
    JobBase, JobConfig, JobsByRepo, Periodic, Periodics, PodSpec, Postsubmit, Postsubmits,
    Presubmit, Presubmits, ProwJob, RehearseError, Result, SelectionEvent, SelectionReason,
    SemanticEq, SubjectKind, TestStep, CLUSTER_PROFILE_VOLUME, DEFAULT_CLUSTER, KUBERNETES_AGENT,
};

pub use naming::{test_name, JobIndex, JobKind, IMAGES_TEST};

pub use diff::cluster_profile::{
    presubmits_for_cluster_profiles, ClusterProfile, CLUSTER_PROFILE_PREFIX,
};
pub use diff::config::{diff_configs, AffectedTests, ConfigDiff};
pub use diff::derived::{
    derive_jobs, images_postsubmits_for_configs, presubmits_for_configs, DerivedJobs,
};
pub use diff::periodics::diff_periodics;
pub use diff::presubmits::{diff_presubmits, PresubmitRule};
pub use diff::{PeriodicSelection, PostsubmitInContext, PostsubmitSelection, PresubmitSelection};

pub use loader::{
    info_from_path, load_configs, load_job_config, CONFIG_IN_REPO_PATH, JOB_CONFIG_IN_REPO_PATH,
};
pub use selection::{select_rehearsals, RehearsalSelection, Snapshot};

pub use reporting::{
    render_selection_summary_md, selection_fingerprint, write_selection_report_json,
    write_selection_summary_md, SelectedJobArtifact, SelectionReport, SelectionSummaryArtifact,
    REPORT_SCHEMA_VERSION,
};

pub use obs::{
    emit_load_error, emit_selection_event, emit_selection_events, emit_selection_summary,
    emit_snapshot_loaded, SelectionSpan,
};
pub use telemetry::init_tracing;

/// Rehearse version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
