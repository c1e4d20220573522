//! Periodic affected-set resolution.

use super::PeriodicSelection;
use crate::domain::{
    periodics_by_name, Periodic, ProwJob, SelectionEvent, SelectionReason, SemanticEq, SubjectKind,
};

/// Select candidate periodics whose spec or cluster differ from the baseline.
///
/// Both sides are deduplicated by name first (last definition wins). Periodics
/// without a same-named baseline are new and always selected.
pub fn diff_periodics(master: &[Periodic], candidate: &[Periodic]) -> PeriodicSelection {
    let baseline = periodics_by_name(master);
    let mut selection = PeriodicSelection::default();

    for (name, job) in periodics_by_name(candidate) {
        if !job.is_kubernetes() {
            continue;
        }
        let reason = match baseline.get(name) {
            None => SelectionReason::NewJob,
            Some(old) if !old.base.spec.semantic_eq(&job.base.spec) => SelectionReason::SpecChanged,
            Some(old) if old.base.cluster != job.base.cluster => SelectionReason::ClusterChanged {
                from: old.base.cluster.clone(),
                to: job.base.cluster.clone(),
            },
            Some(_) => continue,
        };
        selection
            .events
            .push(SelectionEvent::job(SubjectKind::Periodic, None, name, reason));
        selection.selected.insert(name.to_string(), job.clone());
    }

    selection
}
