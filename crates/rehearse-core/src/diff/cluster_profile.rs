//! Presubmits that consume a cluster profile.
//!
//! A cluster profile reaches a job as a config map projected into the pod's
//! `cluster-profile` volume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PresubmitSelection;
use crate::domain::{
    Presubmits, ProwJob, SelectionEvent, SelectionReason, SubjectKind, CLUSTER_PROFILE_VOLUME,
};

/// Prefix of the config map a cluster profile is published as.
pub const CLUSTER_PROFILE_PREFIX: &str = "cluster-profile-";

/// A named deployment/credential profile, e.g. `aws` or `gcp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterProfile(String);

impl ClusterProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Name of the config map carrying this profile.
    pub fn config_map_name(&self) -> String {
        format!("{}{}", CLUSTER_PROFILE_PREFIX, self.0)
    }
}

impl std::fmt::Display for ClusterProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ClusterProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Kubernetes-agent presubmits that mount any of `profiles`.
pub fn presubmits_for_cluster_profiles(
    presubmits: &Presubmits,
    profiles: &[ClusterProfile],
) -> PresubmitSelection {
    let mut selection = PresubmitSelection::default();
    if profiles.is_empty() {
        return selection;
    }
    let by_config_map: BTreeMap<String, &ClusterProfile> = profiles
        .iter()
        .map(|p| (p.config_map_name(), p))
        .collect();

    for (repo, job) in presubmits.jobs() {
        if !job.is_kubernetes() {
            continue;
        }
        let Some(spec) = &job.base.spec else {
            continue;
        };
        let Some(profile) = spec
            .projected_config_maps(CLUSTER_PROFILE_VOLUME)
            .find_map(|name| by_config_map.get(name))
        else {
            continue;
        };
        selection.events.push(SelectionEvent::job(
            SubjectKind::Presubmit,
            Some(repo),
            job.name(),
            SelectionReason::ClusterProfile {
                profile: profile.name().to_string(),
            },
        ));
        selection.selected.add(repo, job.clone());
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobBase, PodSpec, Presubmit};
    use serde_json::json;

    fn mounting(name: &str, volume: &str, config_map: &str) -> Presubmit {
        let spec: PodSpec = serde_json::from_value(json!({
            "containers": [{"image": "ci-operator"}],
            "volumes": [{
                "name": volume,
                "projected": {"sources": [{"configMap": {"name": config_map}}]}
            }]
        }))
        .expect("pod spec");
        Presubmit::new(JobBase::new(name).with_spec(spec))
    }

    #[test]
    fn test_config_map_name() {
        assert_eq!(ClusterProfile::new("aws").config_map_name(), "cluster-profile-aws");
    }

    #[test]
    fn test_only_cluster_profile_volume_counts() {
        let mut presubmits = Presubmits::new();
        presubmits.add("org/repo", mounting("a", "cluster-profile", "cluster-profile-aws"));
        presubmits.add("org/repo", mounting("b", "secrets", "cluster-profile-aws"));
        presubmits.add("org/repo", mounting("c", "cluster-profile", "cluster-profile-gcp"));
        presubmits.add("org/repo", Presubmit::new(JobBase::new("d")));

        let selection =
            presubmits_for_cluster_profiles(&presubmits, &[ClusterProfile::new("aws")]);
        assert_eq!(selection.selected.len(), 1);
        assert!(selection.selected.contains("org/repo", "a"));
        assert_eq!(
            selection.events[0].reason,
            SelectionReason::ClusterProfile {
                profile: "aws".to_string()
            }
        );
    }

    #[test]
    fn test_no_profiles_selects_nothing() {
        let mut presubmits = Presubmits::new();
        presubmits.add("org/repo", mounting("a", "cluster-profile", "cluster-profile-aws"));
        assert!(presubmits_for_cluster_profiles(&presubmits, &[]).selected.is_empty());
    }
}
