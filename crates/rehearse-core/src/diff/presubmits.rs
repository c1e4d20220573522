//! Presubmit affected-set resolution.
//!
//! Compares two presubmit corpora job by job and selects candidate jobs whose
//! behaviour could differ from the baseline under a fixed set of rules.

use serde::{Deserialize, Serialize};

use super::PresubmitSelection;
use crate::domain::{
    Presubmit, Presubmits, ProwJob, SelectionEvent, SelectionReason, SemanticEq, SubjectKind,
};
use crate::naming::JobIndex;

/// A single rule that selects a presubmit for rehearsal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresubmitRule {
    /// No kubernetes-agent baseline job with the same name.
    NewJob,
    /// Pod spec changed.
    SpecChanged,
    /// Baseline was optional, candidate is required.
    NoLongerOptional,
    /// Baseline ran conditionally, candidate always runs.
    NowAlwaysRun,
    /// Execution cluster changed.
    ClusterChanged,
}

impl PresubmitRule {
    /// Every rule, in evaluation order.
    pub const ALL: [PresubmitRule; 5] = [
        PresubmitRule::NewJob,
        PresubmitRule::SpecChanged,
        PresubmitRule::NoLongerOptional,
        PresubmitRule::NowAlwaysRun,
        PresubmitRule::ClusterChanged,
    ];

    /// Evaluate this rule for `candidate` against its kubernetes-agent baseline.
    pub fn check(
        &self,
        baseline: Option<&Presubmit>,
        candidate: &Presubmit,
    ) -> Option<SelectionReason> {
        let Some(baseline) = baseline else {
            return (*self == PresubmitRule::NewJob).then_some(SelectionReason::NewJob);
        };
        match self {
            PresubmitRule::NewJob => None,
            PresubmitRule::SpecChanged => (!baseline.base.spec.semantic_eq(&candidate.base.spec))
                .then_some(SelectionReason::SpecChanged),
            PresubmitRule::NoLongerOptional => (baseline.optional && !candidate.optional)
                .then_some(SelectionReason::NoLongerOptional),
            PresubmitRule::NowAlwaysRun => (!baseline.always_run && candidate.always_run)
                .then_some(SelectionReason::NowAlwaysRun),
            PresubmitRule::ClusterChanged => {
                (baseline.base.cluster != candidate.base.cluster).then(|| {
                    SelectionReason::ClusterChanged {
                        from: baseline.base.cluster.clone(),
                        to: candidate.base.cluster.clone(),
                    }
                })
            }
        }
    }
}

/// Select candidate presubmits that changed relative to the baseline.
///
/// Only kubernetes-agent jobs take part: other agents are neither selected nor
/// used as a baseline. The first matching [`PresubmitRule`] is the reported reason.
pub fn diff_presubmits(master: &Presubmits, candidate: &Presubmits) -> PresubmitSelection {
    let baseline = JobIndex::build(master);
    let mut selection = PresubmitSelection::default();

    for (repo, job) in candidate.jobs() {
        if !job.is_kubernetes() {
            continue;
        }
        let master_job = baseline.get(repo, job.name());
        let Some(reason) = PresubmitRule::ALL
            .iter()
            .find_map(|rule| rule.check(master_job, job))
        else {
            continue;
        };
        selection.events.push(SelectionEvent::job(
            SubjectKind::Presubmit,
            Some(repo),
            job.name(),
            reason,
        ));
        selection.selected.add(repo, job.clone());
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Agent, JobBase, PodSpec};
    use serde_json::json;

    fn job(name: &str) -> Presubmit {
        Presubmit::new(JobBase::new(name))
    }

    fn corpus(job: Presubmit) -> Presubmits {
        let mut presubmits = Presubmits::new();
        presubmits.add("org/repo", job);
        presubmits
    }

    fn spec(container: serde_json::Value) -> PodSpec {
        serde_json::from_value(json!({"containers": [container]})).expect("pod spec")
    }

    fn reasons(master: Presubmit, candidate: Presubmit) -> Vec<SelectionReason> {
        diff_presubmits(&corpus(master), &corpus(candidate))
            .events
            .into_iter()
            .map(|e| e.reason)
            .collect()
    }

    #[test]
    fn test_rule_order_reports_first_match() {
        let baseline = job("a").with_optional(true);
        let candidate =
            Presubmit::new(JobBase::new("a").with_cluster("build02")).with_optional(false);
        let reason = PresubmitRule::ALL
            .iter()
            .find_map(|rule| rule.check(Some(&baseline), &candidate));
        assert_eq!(reason, Some(SelectionReason::NoLongerOptional));
    }

    #[test]
    fn test_missing_baseline_only_matches_new_job() {
        let candidate = job("a");
        for rule in PresubmitRule::ALL {
            let expected = (rule == PresubmitRule::NewJob).then_some(SelectionReason::NewJob);
            assert_eq!(rule.check(None, &candidate), expected, "{:?}", rule);
        }
    }

    #[test]
    fn test_non_kubernetes_baseline_counts_as_missing() {
        let mut master = Presubmits::new();
        master.add(
            "org/repo",
            Presubmit::new(JobBase::new("a").with_agent(Agent::Other("jenkins".to_string()))),
        );
        let mut candidate = Presubmits::new();
        candidate.add("org/repo", job("a"));

        let selection = diff_presubmits(&master, &candidate);
        assert!(selection.selected.contains("org/repo", "a"));
        assert_eq!(selection.events[0].reason, SelectionReason::NewJob);
    }

    #[test]
    fn test_spec_change_selected() {
        let master = Presubmit::new(JobBase::new("a").with_spec(spec(json!({"image": "ci"}))));
        let candidate = Presubmit::new(JobBase::new("a").with_spec(spec(json!({
            "image": "ci",
            "securityContext": {"privileged": false}
        }))));
        assert_eq!(reasons(master, candidate), vec![SelectionReason::SpecChanged]);
    }

    #[test]
    fn test_now_always_run_selected() {
        let master = job("a");
        let candidate = job("a").with_always_run(true);
        assert_eq!(reasons(master, candidate), vec![SelectionReason::NowAlwaysRun]);
    }

    #[test]
    fn test_cluster_change_alone_selected() {
        let master = job("a");
        let candidate = Presubmit::new(JobBase::new("a").with_cluster("build01"));
        assert_eq!(
            reasons(master, candidate),
            vec![SelectionReason::ClusterChanged {
                from: "default".to_string(),
                to: "build01".to_string(),
            }]
        );
    }

    #[test]
    fn test_loosening_transitions_not_selected() {
        assert!(reasons(job("a"), job("a").with_optional(true)).is_empty());
        assert!(reasons(job("a").with_always_run(true), job("a")).is_empty());
    }

    #[test]
    fn test_non_kubernetes_candidate_ignored_despite_spec_change() {
        let jenkins = |image: &str| {
            Presubmit::new(
                JobBase::new("a")
                    .with_agent(Agent::Other("jenkins".to_string()))
                    .with_spec(spec(json!({"image": image}))),
            )
        };
        assert!(reasons(jenkins("old"), jenkins("new")).is_empty());
    }
}
