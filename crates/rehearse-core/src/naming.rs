//! Job naming convention and job index.
//!
//! Generated jobs are tied to the configuration that produced them only through
//! their names: `{prefix}-ci-{org}-{repo}-{branch}[-{variant}]-{test}`. This module
//! owns that convention and builds a [`JobIndex`] per corpus so lookups by
//! configuration are a sorted range scan instead of a string match over every job.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::domain::{Info, JobsByRepo, ProwJob};

pub const PRESUBMIT_PREFIX: &str = "pull";
pub const POSTSUBMIT_PREFIX: &str = "branch";
pub const PERIODIC_PREFIX: &str = "periodic";

/// Test name of the postsubmit that builds and promotes a configuration's images.
pub const IMAGES_TEST: &str = "images";

/// Job kinds that carry a naming prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Presubmit,
    Postsubmit,
    Periodic,
}

impl JobKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            JobKind::Presubmit => PRESUBMIT_PREFIX,
            JobKind::Postsubmit => POSTSUBMIT_PREFIX,
            JobKind::Periodic => PERIODIC_PREFIX,
        }
    }
}

impl Info {
    /// Full name of the job generated for `test` of this configuration.
    pub fn job_name(&self, kind: JobKind, test: &str) -> String {
        let mut name = format!(
            "{}-ci-{}-{}-{}",
            kind.prefix(),
            self.org,
            self.repo,
            self.branch.replace('/', "-")
        );
        if let Some(variant) = &self.variant {
            name.push('-');
            name.push_str(variant);
        }
        name.push('-');
        name.push_str(test);
        name
    }

    /// Prefix shared by every job of `kind` generated from this configuration.
    pub fn job_name_prefix(&self, kind: JobKind) -> String {
        self.job_name(kind, "")
    }
}

/// Recover the test name from a job name, or `None` when the job does not
/// follow the convention for `prefix`.
pub fn test_name<'a>(job_name: &'a str, prefix: &str) -> Option<&'a str> {
    job_name.strip_prefix(prefix).filter(|test| !test.is_empty())
}

/// Kubernetes-agent jobs of one corpus, indexed by repository and name.
#[derive(Debug)]
pub struct JobIndex<'a, J> {
    by_repo: BTreeMap<&'a str, BTreeMap<&'a str, &'a J>>,
}

impl<'a, J: ProwJob> JobIndex<'a, J> {
    /// Index every kubernetes-agent job; a duplicated name within a repository
    /// resolves to its last occurrence.
    pub fn build(corpus: &'a JobsByRepo<J>) -> Self {
        let mut by_repo: BTreeMap<&'a str, BTreeMap<&'a str, &'a J>> = BTreeMap::new();
        for (repo, job) in corpus.jobs() {
            if job.is_kubernetes() {
                by_repo.entry(repo).or_default().insert(job.name(), job);
            }
        }
        Self { by_repo }
    }

    pub fn get(&self, repo: &str, name: &str) -> Option<&'a J> {
        self.by_repo.get(repo)?.get(name).copied()
    }

    /// Jobs of `kind` generated from the configuration `info`, as
    /// `(test name, job)` pairs sorted by job name.
    pub fn jobs_for(&self, info: &Info, kind: JobKind) -> Vec<(&'a str, &'a J)> {
        let Some(jobs) = self.by_repo.get(info.org_repo().as_str()) else {
            return Vec::new();
        };
        let prefix = info.job_name_prefix(kind);
        jobs.range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(prefix.as_str()))
            .filter_map(|(name, job)| test_name(*name, &prefix).map(|test| (test, *job)))
            .collect()
    }

    /// Number of indexed jobs.
    pub fn len(&self) -> usize {
        self.by_repo.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_repo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Agent, JobBase, Presubmit, Presubmits};

    #[test]
    fn test_job_names_per_kind() {
        let info = Info::new("org", "repo", "master");
        assert_eq!(
            info.job_name(JobKind::Presubmit, "unit"),
            "pull-ci-org-repo-master-unit"
        );
        assert_eq!(
            info.job_name(JobKind::Postsubmit, IMAGES_TEST),
            "branch-ci-org-repo-master-images"
        );
        assert_eq!(
            info.job_name(JobKind::Periodic, "e2e"),
            "periodic-ci-org-repo-master-e2e"
        );
        assert_eq!(
            info.job_name_prefix(JobKind::Presubmit),
            "pull-ci-org-repo-master-"
        );
    }

    #[test]
    fn test_job_name_with_variant_and_slashed_branch() {
        let info = Info::new("org", "repo", "feature/x").with_variant("okd");
        assert_eq!(
            info.job_name(JobKind::Presubmit, "e2e"),
            "pull-ci-org-repo-feature-x-okd-e2e"
        );
    }

    #[test]
    fn test_test_name_stripping() {
        let prefix = "pull-ci-org-repo-master-";
        assert_eq!(test_name("pull-ci-org-repo-master-e2e-aws", prefix), Some("e2e-aws"));
        assert_eq!(test_name("pull-ci-org-repo-release-4.1-e2e", prefix), None);
        assert_eq!(test_name(prefix, prefix), None);
    }

    #[test]
    fn test_index_range_lookup_and_agent_filter() {
        let mut corpus = Presubmits::new();
        for name in [
            "pull-ci-org-repo-master-unit",
            "pull-ci-org-repo-master-e2e",
            "pull-ci-org-repo-master2-unit",
            "pull-ci-org-repo-release-4.1-unit",
            "custom-lint",
        ] {
            corpus.add("org/repo", Presubmit::new(JobBase::new(name)));
        }
        corpus.add(
            "org/repo",
            Presubmit::new(
                JobBase::new("pull-ci-org-repo-master-jenkins")
                    .with_agent(Agent::Other("jenkins".to_string())),
            ),
        );

        let index = JobIndex::build(&corpus);
        assert_eq!(index.len(), 5);
        assert!(index.get("org/repo", "pull-ci-org-repo-master-jenkins").is_none());

        let info = Info::new("org", "repo", "master");
        let tests: Vec<&str> = index
            .jobs_for(&info, JobKind::Presubmit)
            .into_iter()
            .map(|(test, _)| test)
            .collect();
        assert_eq!(tests, vec!["e2e", "unit"]);

        let other = Info::new("org", "missing", "master");
        assert!(index.jobs_for(&other, JobKind::Presubmit).is_empty());
    }
}
