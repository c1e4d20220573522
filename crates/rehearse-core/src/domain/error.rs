//! Error taxonomy for loading and reporting.
//!
//! The diff and selection logic itself is total and never returns these.

use std::path::PathBuf;

/// Errors produced while loading configuration trees or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum RehearseError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to parse yaml in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed configuration path {path}: {reason}")]
    InvalidConfigPath { path: PathBuf, reason: String },

    #[error("duplicate configuration key {key}: {first} and {second}")]
    DuplicateConfigKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for loading and reporting operations.
pub type Result<T> = std::result::Result<T, RehearseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_path_display() {
        let err = RehearseError::InvalidConfigPath {
            path: PathBuf::from("ci-operator/config/org/repo/bad.yaml"),
            reason: "filename must start with org-repo-".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad.yaml"));
        assert!(msg.contains("org-repo-"));
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = RehearseError::DuplicateConfigKey {
            key: "org-repo-master.yaml".to_string(),
            first: PathBuf::from("a/org-repo-master.yaml"),
            second: PathBuf::from("b/org-repo-master.yaml"),
        };
        let msg = err.to_string();
        assert!(msg.contains("org-repo-master.yaml"));
        assert!(msg.contains("a/"));
        assert!(msg.contains("b/"));
    }
}
