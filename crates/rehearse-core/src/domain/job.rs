//! Prow job model: presubmits, postsubmits and periodics.
//!
//! Loaded job definitions keep the defaults the job controller would apply: a
//! missing `agent` is `kubernetes` and a missing `cluster` is `default`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::semantic::SemanticEq;

/// The only agent eligible for rehearsal.
pub const KUBERNETES_AGENT: &str = "kubernetes";

/// Cluster a job runs on when it does not name one.
pub const DEFAULT_CLUSTER: &str = "default";

/// Volume name under which cluster profiles are mounted into job pods.
pub const CLUSTER_PROFILE_VOLUME: &str = "cluster-profile";

/// Execution backend of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Agent {
    #[default]
    Kubernetes,
    Other(String),
}

impl From<String> for Agent {
    fn from(value: String) -> Self {
        if value.is_empty() || value == KUBERNETES_AGENT {
            Agent::Kubernetes
        } else {
            Agent::Other(value)
        }
    }
}

impl From<Agent> for String {
    fn from(agent: Agent) -> Self {
        match agent {
            Agent::Kubernetes => KUBERNETES_AGENT.to_string(),
            Agent::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Agent::Kubernetes => f.write_str(KUBERNETES_AGENT),
            Agent::Other(name) => f.write_str(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Pod spec
// ---------------------------------------------------------------------------

/// Pod specification of a job. Volumes are typed for cluster-profile lookup;
/// containers and everything else are opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected: Option<ProjectedVolumeSource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedVolumeSource {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<VolumeProjection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeProjection {
    #[serde(rename = "configMap", default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapProjection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigMapProjection {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PodSpec {
    /// Names of config maps projected into the volume called `volume_name`.
    pub fn projected_config_maps<'a>(
        &'a self,
        volume_name: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.volumes
            .iter()
            .filter(move |v| v.name == volume_name)
            .filter_map(|v| v.projected.as_ref())
            .flat_map(|p| p.sources.iter())
            .filter_map(|s| s.config_map.as_ref())
            .map(|cm| cm.name.as_str())
    }
}

impl SemanticEq for PodSpec {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.volumes.semantic_eq(&other.volumes) && self.extra.semantic_eq(&other.extra)
    }
}

impl SemanticEq for Volume {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.projected.semantic_eq(&other.projected)
            && self.extra.semantic_eq(&other.extra)
    }
}

impl SemanticEq for ProjectedVolumeSource {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.sources.semantic_eq(&other.sources) && self.extra.semantic_eq(&other.extra)
    }
}

impl SemanticEq for VolumeProjection {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.config_map.semantic_eq(&other.config_map) && self.extra.semantic_eq(&other.extra)
    }
}

impl SemanticEq for ConfigMapProjection {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.name == other.name && self.extra.semantic_eq(&other.extra)
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

/// Fields shared by every job kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobBase {
    pub name: String,
    #[serde(default)]
    pub agent: Agent,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent: Agent::Kubernetes,
            cluster: default_cluster(),
            spec: None,
            labels: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Builder: set the agent.
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = agent;
        self
    }

    /// Builder: set the cluster.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Builder: set the pod spec.
    pub fn with_spec(mut self, spec: PodSpec) -> Self {
        self.spec = Some(spec);
        self
    }
}

/// Accessors shared by every job kind.
pub trait ProwJob {
    fn base(&self) -> &JobBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn is_kubernetes(&self) -> bool {
        self.base().agent == Agent::Kubernetes
    }
}

/// A job gated on a proposed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presubmit {
    #[serde(flatten)]
    pub base: JobBase,
    #[serde(default)]
    pub always_run: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_if_changed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_only_changed: Option<String>,
}

impl Presubmit {
    pub fn new(base: JobBase) -> Self {
        Self {
            base,
            always_run: false,
            optional: false,
            run_if_changed: None,
            skip_if_only_changed: None,
        }
    }

    /// Builder: set `always_run`.
    pub fn with_always_run(mut self, always_run: bool) -> Self {
        self.always_run = always_run;
        self
    }

    /// Builder: set `optional`.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// A job run after a change merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postsubmit {
    #[serde(flatten)]
    pub base: JobBase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
}

impl Postsubmit {
    pub fn new(base: JobBase) -> Self {
        Self {
            base,
            branches: Vec::new(),
        }
    }
}

/// A job run on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodic {
    #[serde(flatten)]
    pub base: JobBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
}

impl Periodic {
    pub fn new(base: JobBase) -> Self {
        Self {
            base,
            interval: None,
            cron: None,
        }
    }
}

impl ProwJob for Presubmit {
    fn base(&self) -> &JobBase {
        &self.base
    }
}

impl ProwJob for Postsubmit {
    fn base(&self) -> &JobBase {
        &self.base
    }
}

impl ProwJob for Periodic {
    fn base(&self) -> &JobBase {
        &self.base
    }
}

// ---------------------------------------------------------------------------
// Corpora
// ---------------------------------------------------------------------------

/// Jobs of one kind grouped by `org/repo`, in definition order within a repo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobsByRepo<J>(BTreeMap<String, Vec<J>>);

impl<J> Default for JobsByRepo<J> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<J: ProwJob> JobsByRepo<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to a repository.
    pub fn add(&mut self, repo: impl Into<String>, job: J) {
        self.0.entry(repo.into()).or_default().push(job);
    }

    /// Whether `repo` holds a job called `name`.
    pub fn contains(&self, repo: &str, name: &str) -> bool {
        self.0
            .get(repo)
            .is_some_and(|jobs| jobs.iter().any(|j| j.name() == name))
    }

    /// Add every job from `other` not already present under the same repo and name.
    pub fn merge(&mut self, other: JobsByRepo<J>) {
        for (repo, jobs) in other.0 {
            for job in jobs {
                if !self.contains(&repo, job.name()) {
                    self.add(repo.clone(), job);
                }
            }
        }
    }

    /// Append every job from `other`, keeping duplicates.
    pub fn extend(&mut self, other: JobsByRepo<J>) {
        for (repo, jobs) in other.0 {
            self.0.entry(repo).or_default().extend(jobs);
        }
    }

    pub fn get(&self, repo: &str) -> &[J] {
        self.0.get(repo).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[J])> {
        self.0.iter().map(|(repo, jobs)| (repo.as_str(), jobs.as_slice()))
    }

    /// Every job paired with its repository.
    pub fn jobs(&self) -> impl Iterator<Item = (&str, &J)> {
        self.0
            .iter()
            .flat_map(|(repo, jobs)| jobs.iter().map(move |j| (repo.as_str(), j)))
    }

    /// Total number of jobs across repositories.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type Presubmits = JobsByRepo<Presubmit>;
pub type Postsubmits = JobsByRepo<Postsubmit>;

/// Periodics keyed by job name.
pub type Periodics = BTreeMap<String, Periodic>;

/// The full job configuration of one revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default, skip_serializing_if = "JobsByRepo::is_empty")]
    pub presubmits: Presubmits,
    #[serde(default, skip_serializing_if = "JobsByRepo::is_empty")]
    pub postsubmits: Postsubmits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periodics: Vec<Periodic>,
}

impl JobConfig {
    /// Fold another partial job configuration (e.g. from another file) into this one.
    pub fn merge(&mut self, other: JobConfig) {
        self.presubmits.extend(other.presubmits);
        self.postsubmits.extend(other.postsubmits);
        self.periodics.extend(other.periodics);
    }
}

/// Periodics keyed by name; a duplicated name resolves to its last occurrence.
pub fn periodics_by_name(periodics: &[Periodic]) -> BTreeMap<&str, &Periodic> {
    periodics.iter().map(|p| (p.name(), p)).collect()
}
