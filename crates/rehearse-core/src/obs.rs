//! Structured observability hooks for rehearsal selection.
//!
//! This module provides:
//! - A selection-scoped tracing span via the `SelectionSpan` RAII guard
//! - Emission functions for snapshot loading, classification events and the
//!   final selection summary
//!
//! The diff layer never logs; callers hand its [`SelectionEvent`]s to these
//! functions. Events are emitted at `info!` level (filter with `RUST_LOG`).

use tracing::{info, warn};

use crate::domain::SelectionEvent;
use crate::selection::RehearsalSelection;

/// RAII guard that enters a span for one selection computation.
///
/// # Example
///
/// ```ignore
/// let _span = SelectionSpan::enter("/src/master", "/src/candidate");
/// // every event logged now carries master and candidate fields
/// ```
pub struct SelectionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SelectionSpan {
    pub fn enter(master: &str, candidate: &str) -> Self {
        let span = tracing::info_span!("rehearse.select", master = %master, candidate = %candidate);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a revision was loaded.
pub fn emit_snapshot_loaded(
    revision: &str,
    configs: usize,
    presubmits: usize,
    postsubmits: usize,
    periodics: usize,
) {
    info!(
        event = "snapshot.loaded",
        revision = %revision,
        configs = configs,
        presubmits = presubmits,
        postsubmits = postsubmits,
        periodics = periodics,
    );
}

/// Emit event: one classification decision.
///
/// # Example
///
/// ```ignore
/// emit_selection_event(&event);
/// // logs: event=selection.chosen kind=presubmit subject=pull-ci-... reason="spec changed"
/// ```
pub fn emit_selection_event(event: &SelectionEvent) {
    info!(
        event = "selection.chosen",
        kind = event.kind.as_str(),
        subject = %event.subject,
        repo = event.repo.as_deref().unwrap_or(""),
        reason = %event.reason,
        "{}",
        event.message()
    );
}

pub fn emit_selection_events(events: &[SelectionEvent]) {
    for event in events {
        emit_selection_event(event);
    }
}

/// Emit event: selection finished.
pub fn emit_selection_summary(selection: &RehearsalSelection) {
    info!(
        event = "selection.finished",
        changed_configs = selection.changed_configs.len(),
        affected_configs = selection.affected_tests.len(),
        presubmits = selection.presubmits.len(),
        postsubmits = selection.postsubmits.len(),
        periodics = selection.periodics.len(),
    );
}

/// Emit event: loading a revision failed (warning level).
pub fn emit_load_error(revision: &str, error: &dyn std::fmt::Display) {
    warn!(event = "snapshot.load_error", revision = %revision, error = %error);
}
