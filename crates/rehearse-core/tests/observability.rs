//! Observability tests for rehearsal selection tracing.
//!
//! These verify that the structured events the CLI relies on are emitted with
//! their `event` field and the subject of each classification decision.

use rehearse_core::{
    emit_load_error, emit_selection_event, emit_selection_events, emit_selection_summary,
    emit_snapshot_loaded, select_rehearsals, JobBase, Presubmit, RehearsalSelection,
    SelectionEvent, SelectionReason, SelectionSpan, Snapshot, SubjectKind,
};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_snapshot_loaded_logs_counts() {
    emit_snapshot_loaded("master", 3, 10, 2, 1);
    assert!(logs_contain("snapshot.loaded"));
    assert!(logs_contain("revision=master"));
}

#[traced_test]
#[test]
fn test_emit_selection_event_logs_subject_and_reason() {
    let event = SelectionEvent::job(
        SubjectKind::Presubmit,
        Some("org/repo"),
        "pull-ci-org-repo-master-unit",
        SelectionReason::SpecChanged,
    );
    emit_selection_event(&event);

    assert!(logs_contain("selection.chosen"));
    assert!(logs_contain("pull-ci-org-repo-master-unit"));
    assert!(logs_contain("org/repo"));
    assert!(logs_contain("Job has been chosen for rehearsal"));
}

#[traced_test]
#[test]
fn test_emit_config_event_uses_config_message() {
    emit_selection_events(&[SelectionEvent::config(
        "org-repo-master.yaml",
        SelectionReason::NewConfig,
    )]);
    assert!(logs_contain("New ci-operator config file"));
}

#[traced_test]
#[test]
fn test_emit_selection_summary_logs_finished() {
    emit_selection_summary(&RehearsalSelection::default());
    assert!(logs_contain("selection.finished"));
}

#[traced_test]
#[test]
fn test_emit_load_error_logs_warning() {
    emit_load_error("candidate", &"malformed configuration path");
    assert!(logs_contain("snapshot.load_error"));
    assert!(logs_contain("WARN"));
}

#[traced_test]
#[test]
fn test_events_inside_span_carry_span_name() {
    let mut candidate = Snapshot::default();
    candidate
        .jobs
        .presubmits
        .add("org/repo", Presubmit::new(JobBase::new("pull-ci-org-repo-master-unit")));

    let _span = SelectionSpan::enter("master-dir", "candidate-dir");
    let selection = select_rehearsals(&Snapshot::default(), &candidate, &[]);
    emit_selection_events(&selection.events);

    assert!(logs_contain("rehearse.select"));
    assert!(logs_contain("pull-ci-org-repo-master-unit"));
}
