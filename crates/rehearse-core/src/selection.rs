//! End-to-end rehearsal selection.
//!
//! Runs every diff component over a baseline and a candidate [`Snapshot`] and
//! unions their results into one [`RehearsalSelection`].

use serde::{Deserialize, Serialize};

use crate::diff::cluster_profile::{presubmits_for_cluster_profiles, ClusterProfile};
use crate::diff::config::{diff_configs, AffectedTests};
use crate::diff::derived::derive_jobs;
use crate::diff::periodics::diff_periodics;
use crate::diff::presubmits::diff_presubmits;
use crate::diff::PostsubmitInContext;
use crate::domain::{ByFilename, JobConfig, Periodics, Presubmits, SelectionEvent};

/// Everything loaded from one revision of the release repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub configs: ByFilename,
    pub jobs: JobConfig,
}

impl Snapshot {
    pub fn new(configs: ByFilename, jobs: JobConfig) -> Self {
        Self { configs, jobs }
    }
}

/// The configurations and jobs a candidate revision requires rehearsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RehearsalSelection {
    pub changed_configs: ByFilename,
    pub affected_tests: AffectedTests,
    /// Union of changed presubmits, presubmits of changed configurations and
    /// presubmits using the given cluster profiles, one entry per repo and name.
    pub presubmits: Presubmits,
    /// `images` postsubmits of changed configurations.
    pub postsubmits: Vec<PostsubmitInContext>,
    pub periodics: Periodics,
    pub events: Vec<SelectionEvent>,
}

impl RehearsalSelection {
    /// Number of selected jobs across all kinds.
    pub fn job_count(&self) -> usize {
        self.presubmits.len() + self.postsubmits.len() + self.periodics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_configs.is_empty() && self.job_count() == 0
    }
}

/// Compute the rehearsal selection for `candidate` against `master`.
///
/// `profiles` are the cluster profiles touched by the change; presubmits
/// mounting any of them are selected as well.
pub fn select_rehearsals(
    master: &Snapshot,
    candidate: &Snapshot,
    profiles: &[ClusterProfile],
) -> RehearsalSelection {
    let config_diff = diff_configs(&master.configs, &candidate.configs);
    let derived = derive_jobs(&candidate.jobs, &config_diff);
    let changed_presubmits = diff_presubmits(&master.jobs.presubmits, &candidate.jobs.presubmits);
    let profile_presubmits =
        presubmits_for_cluster_profiles(&candidate.jobs.presubmits, profiles);
    let periodics = diff_periodics(&master.jobs.periodics, &candidate.jobs.periodics);

    let mut presubmits = changed_presubmits.selected;
    presubmits.merge(derived.presubmits.selected);
    presubmits.merge(profile_presubmits.selected);

    let mut events = config_diff.events;
    events.extend(changed_presubmits.events);
    events.extend(derived.presubmits.events);
    events.extend(profile_presubmits.events);
    events.extend(derived.images.events);
    events.extend(periodics.events);

    RehearsalSelection {
        changed_configs: config_diff.changed,
        affected_tests: config_diff.affected_tests,
        presubmits,
        postsubmits: derived.images.selected,
        periodics: periodics.selected,
        events,
    }
}
