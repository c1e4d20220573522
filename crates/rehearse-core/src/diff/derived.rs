//! Jobs derived from changed configurations.
//!
//! Generated jobs are found through the naming convention: a job belongs to a
//! configuration when its name starts with that configuration's prefix for the
//! job kind, and the remainder of the name is the test it runs.

use super::config::{AffectedTests, ConfigDiff};
use super::{PostsubmitInContext, PostsubmitSelection, PresubmitSelection};
use crate::domain::{
    ByFilename, JobConfig, Postsubmit, Presubmit, SelectionEvent, SelectionReason, SubjectKind,
};
use crate::naming::{JobIndex, JobKind, IMAGES_TEST};

/// Jobs selected because the configuration that generates them changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedJobs {
    pub images: PostsubmitSelection,
    pub presubmits: PresubmitSelection,
}

/// The `images` postsubmit of every changed configuration.
pub fn images_postsubmits_for_configs(
    index: &JobIndex<'_, Postsubmit>,
    changed: &ByFilename,
) -> PostsubmitSelection {
    let mut selection = PostsubmitSelection::default();

    for (key, data) in changed {
        let org_repo = data.info.org_repo();
        for (test, job) in index.jobs_for(&data.info, JobKind::Postsubmit) {
            if test != IMAGES_TEST {
                continue;
            }
            selection.events.push(SelectionEvent::job(
                SubjectKind::Postsubmit,
                Some(org_repo.as_str()),
                &job.base.name,
                SelectionReason::ImagesForConfig {
                    config: key.clone(),
                },
            ));
            selection.selected.push(PostsubmitInContext {
                info: data.info.clone(),
                job: job.clone(),
            });
        }
    }

    selection
}

/// Presubmits generated from every changed configuration.
///
/// When only some tests of a configuration changed (it has an entry in
/// `affected_tests`), only those tests' jobs are selected; otherwise all of them.
pub fn presubmits_for_configs(
    index: &JobIndex<'_, Presubmit>,
    changed: &ByFilename,
    affected_tests: &AffectedTests,
) -> PresubmitSelection {
    let mut selection = PresubmitSelection::default();

    for (key, data) in changed {
        let org_repo = data.info.org_repo();
        let only = affected_tests.get(key);
        for (test, job) in index.jobs_for(&data.info, JobKind::Presubmit) {
            if only.is_some_and(|tests| !tests.contains(test)) {
                continue;
            }
            selection.events.push(SelectionEvent::job(
                SubjectKind::Presubmit,
                Some(org_repo.as_str()),
                &job.base.name,
                SelectionReason::TestForConfig {
                    config: key.clone(),
                    test: test.to_string(),
                },
            ));
            selection.selected.add(org_repo.clone(), job.clone());
        }
    }

    selection
}

/// Map a configuration diff onto the candidate job configuration.
pub fn derive_jobs(jobs: &JobConfig, diff: &ConfigDiff) -> DerivedJobs {
    let postsubmits = JobIndex::build(&jobs.postsubmits);
    let presubmits = JobIndex::build(&jobs.presubmits);
    DerivedJobs {
        images: images_postsubmits_for_configs(&postsubmits, &diff.changed),
        presubmits: presubmits_for_configs(&presubmits, &diff.changed, &diff.affected_tests),
    }
}
