//! Keeps every workspace member on the shared workspace version, and the
//! internal path dependency pinned to that same version.

use std::path::{Path, PathBuf};

const MEMBERS: [&str; 2] = ["crates/rehearse-core", "crates/rehearse-cli"];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("workspace root")
        .to_path_buf()
}

fn read_manifest(dir: &Path) -> toml::Value {
    let raw = std::fs::read_to_string(dir.join("Cargo.toml")).expect("read Cargo.toml");
    raw.parse().expect("parse Cargo.toml")
}

fn workspace_version() -> String {
    read_manifest(&workspace_root())["workspace"]["package"]["version"]
        .as_str()
        .expect("workspace version")
        .to_string()
}

#[test]
fn members_inherit_workspace_version() {
    let root = workspace_root();
    for member in MEMBERS {
        let doc = read_manifest(&root.join(member));
        let inherits = doc
            .get("package")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.get("workspace"))
            .and_then(toml::Value::as_bool);
        assert_eq!(
            inherits,
            Some(true),
            "{} should use version.workspace = true",
            member
        );
    }
}

#[test]
fn members_are_listed_in_workspace() {
    let doc = read_manifest(&workspace_root());
    let listed: Vec<&str> = doc["workspace"]["members"]
        .as_array()
        .expect("members array")
        .iter()
        .filter_map(toml::Value::as_str)
        .collect();
    assert_eq!(listed, MEMBERS);
}

#[test]
fn internal_dependency_matches_workspace_version() {
    let doc = read_manifest(&workspace_root());
    let pinned = doc["workspace"]["dependencies"]["rehearse-core"]["version"]
        .as_str()
        .expect("rehearse-core version");
    assert_eq!(pinned, workspace_version());
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    assert_eq!(workspace_version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(rehearse_core::VERSION, env!("CARGO_PKG_VERSION"));
}
