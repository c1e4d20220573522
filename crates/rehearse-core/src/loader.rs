//! Loading configuration and job trees from a release repository working copy.
//!
//! Layout:
//! - `ci-operator/config/{org}/{repo}/{org}-{repo}-{branch}[__{variant}].yaml`
//! - `ci-operator/jobs/**.yaml`, each file a partial job configuration
//!
//! Failures here are fatal to the caller: a tree that cannot be read or parsed
//! would silently shrink the selection.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::domain::{
    ByFilename, ConfigWithInfo, Configuration, Info, JobConfig, RehearseError, Result,
};
use crate::selection::Snapshot;

/// Configuration tree, relative to the release repository root.
pub const CONFIG_IN_REPO_PATH: &str = "ci-operator/config";
/// Job definition tree, relative to the release repository root.
pub const JOB_CONFIG_IN_REPO_PATH: &str = "ci-operator/jobs";

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Every YAML file under `root`, in a stable order.
fn yaml_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| RehearseError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;
        if entry.file_type().is_file() && is_yaml(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| RehearseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&content).map_err(|source| RehearseError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Derive a configuration's identity from its location under the config tree.
pub fn info_from_path(root: &Path, path: &Path) -> Result<Info> {
    let invalid = |reason: String| RehearseError::InvalidConfigPath {
        path: path.to_path_buf(),
        reason,
    };

    let relative = path
        .strip_prefix(root)
        .map_err(|_| invalid(format!("not under {}", root.display())))?;
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    let [org, repo, file] = parts.as_slice() else {
        return Err(invalid("expected {org}/{repo}/{file}.yaml".to_string()));
    };

    let stem = file
        .strip_suffix(".yaml")
        .or_else(|| file.strip_suffix(".yml"))
        .ok_or_else(|| invalid("not a yaml file".to_string()))?;
    let prefix = format!("{}-{}-", org, repo);
    let rest = stem
        .strip_prefix(prefix.as_str())
        .ok_or_else(|| invalid(format!("file name must start with {}", prefix)))?;
    let (branch, variant) = match rest.split_once("__") {
        Some((branch, variant)) => (branch, Some(variant)),
        None => (rest, None),
    };
    if branch.is_empty() || variant.is_some_and(str::is_empty) {
        return Err(invalid("empty branch or variant".to_string()));
    }

    let info = Info::new(*org, *repo, branch);
    Ok(match variant {
        Some(variant) => info.with_variant(variant),
        None => info,
    })
}

/// Load every build configuration under `root`, keyed by file name.
pub fn load_configs(root: &Path) -> Result<ByFilename> {
    let mut configs = ByFilename::new();
    let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();

    for path in yaml_files(root)? {
        let info = info_from_path(root, &path)?;
        let configuration: Configuration = read_yaml(&path)?;
        let key = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| info.basename());
        if let Some(first) = origins.insert(key.clone(), path.clone()) {
            return Err(RehearseError::DuplicateConfigKey {
                key,
                first,
                second: path,
            });
        }
        configs.insert(key, ConfigWithInfo::new(info, configuration));
    }

    Ok(configs)
}

/// Load and merge every job definition file under `root`.
pub fn load_job_config(root: &Path) -> Result<JobConfig> {
    let mut jobs = JobConfig::default();
    for path in yaml_files(root)? {
        let partial: JobConfig = read_yaml(&path)?;
        jobs.merge(partial);
    }
    Ok(jobs)
}

impl Snapshot {
    /// Load both trees from a release repository working copy.
    pub fn load(release_repo: &Path) -> Result<Self> {
        let configs = load_configs(&release_repo.join(CONFIG_IN_REPO_PATH))?;
        let jobs = load_job_config(&release_repo.join(JOB_CONFIG_IN_REPO_PATH))?;
        Ok(Self::new(configs, jobs))
    }
}
