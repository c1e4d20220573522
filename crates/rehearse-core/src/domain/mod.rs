//! Domain model: build configurations, prow jobs and semantic equality.

pub mod config;
pub mod error;
pub mod event;
pub mod job;
pub mod semantic;

pub use config::{ByFilename, ConfigWithInfo, Configuration, Info, TestStep};
pub use error::{RehearseError, Result};
pub use event::{SelectionEvent, SelectionReason, SubjectKind};
pub use job::{
    periodics_by_name, Agent, ConfigMapProjection, JobBase, JobConfig, JobsByRepo, Periodic,
    Periodics, PodSpec, Postsubmit, Postsubmits, Presubmit, Presubmits, ProjectedVolumeSource,
    ProwJob, Volume, VolumeProjection, CLUSTER_PROFILE_VOLUME, DEFAULT_CLUSTER, KUBERNETES_AGENT,
};
pub use semantic::{is_empty_value, SemanticEq};
