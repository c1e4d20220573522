//! Build configuration model.
//!
//! Only the fields the selection logic reasons about are typed. Everything else in
//! a configuration file (build root, images, releases, resources, ...) is carried as
//! opaque JSON so it still participates in equality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::semantic::SemanticEq;

/// Identity of a build configuration: the org/repo/branch it builds, plus an
/// optional variant for configurations that build the same branch differently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Info {
    pub org: String,
    pub repo: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Info {
    pub fn new(org: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            branch: branch.into(),
            variant: None,
        }
    }

    /// Builder: set the variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Repository identifier used to index job corpora, e.g. `"openshift/origin"`.
    pub fn org_repo(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Canonical configuration file name, e.g. `"openshift-origin-master__okd.yaml"`.
    pub fn basename(&self) -> String {
        match &self.variant {
            Some(variant) => format!(
                "{}-{}-{}__{}.yaml",
                self.org, self.repo, self.branch, variant
            ),
            None => format!("{}-{}-{}.yaml", self.org, self.repo, self.branch),
        }
    }
}

impl std::fmt::Display for Info {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.org, self.repo, self.branch)?;
        if let Some(variant) = &self.variant {
            write!(f, " [{}]", variant)?;
        }
        Ok(())
    }
}

/// A single test entry, identified by its `as` name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(rename = "as")]
    pub name: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TestStep {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl SemanticEq for TestStep {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.name == other.name && self.payload.semantic_eq(&other.payload)
    }
}

/// Body of a build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestStep>,
    /// Every non-test field.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Configuration {
    /// Builder: construct from a JSON object body and a test list.
    pub fn new(body: Value, tests: Vec<TestStep>) -> Self {
        let body = match body {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Self { tests, body }
    }

    /// The configuration with its test list projected away.
    pub fn without_tests(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Tests indexed by name. A duplicated name resolves to its last occurrence.
    pub fn tests_by_name(&self) -> BTreeMap<&str, &TestStep> {
        self.tests.iter().map(|t| (t.name.as_str(), t)).collect()
    }
}

/// A configuration together with the identity derived from its location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigWithInfo {
    pub info: Info,
    pub configuration: Configuration,
}

impl ConfigWithInfo {
    pub fn new(info: Info, configuration: Configuration) -> Self {
        Self {
            info,
            configuration,
        }
    }
}

/// Configuration corpus keyed by configuration file name.
pub type ByFilename = BTreeMap<String, ConfigWithInfo>;
