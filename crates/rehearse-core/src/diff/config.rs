//! Configuration corpus diffing.
//!
//! A configuration is compared in two projections: its body without the test
//! list, and its tests by name. A body change invalidates the whole
//! configuration; when only tests changed, the affected test names are recorded
//! so callers can restrict the jobs they pick.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::{ByFilename, SelectionEvent, SelectionReason, SemanticEq};

/// Configuration key → names of the tests that changed in it.
pub type AffectedTests = BTreeMap<String, BTreeSet<String>>;

/// The result of diffing two configuration corpora.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigDiff {
    /// Candidate configurations that are new or differ from the baseline.
    pub changed: ByFilename,
    /// For configurations whose body is unchanged, the tests that differ.
    /// A changed key without an entry here has every test affected.
    pub affected_tests: AffectedTests,
    pub events: Vec<SelectionEvent>,
}

impl ConfigDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Whether a job generated for `test` of configuration `key` is affected.
    pub fn is_test_affected(&self, key: &str, test: &str) -> bool {
        if !self.changed.contains_key(key) {
            return false;
        }
        self.affected_tests
            .get(key)
            .map_or(true, |tests| tests.contains(test))
    }
}

/// Diff a candidate configuration corpus against the baseline.
///
/// Configurations only present in the baseline are ignored: removing a
/// configuration never requires a rehearsal. The same holds for tests removed
/// from a configuration whose body is otherwise unchanged.
pub fn diff_configs(master: &ByFilename, candidate: &ByFilename) -> ConfigDiff {
    let mut diff = ConfigDiff::default();

    for (key, new) in candidate {
        let Some(old) = master.get(key) else {
            diff.changed.insert(key.clone(), new.clone());
            diff.events.push(SelectionEvent::config(key, SelectionReason::NewConfig));
            continue;
        };

        let (old_config, new_config) = (&old.configuration, &new.configuration);
        if !old_config
            .without_tests()
            .semantic_eq(new_config.without_tests())
        {
            diff.changed.insert(key.clone(), new.clone());
            diff.events.push(SelectionEvent::config(key, SelectionReason::ConfigChanged));
            continue;
        }

        let old_tests = old_config.tests_by_name();
        let changed_tests: BTreeSet<String> = new_config
            .tests_by_name()
            .into_iter()
            .filter(|(name, test)| {
                !old_tests
                    .get(name)
                    .is_some_and(|old_test| old_test.semantic_eq(test))
            })
            .map(|(name, _)| name.to_string())
            .collect();

        if changed_tests.is_empty() {
            continue;
        }
        for test in &changed_tests {
            diff.events.push(SelectionEvent::config(
                key,
                SelectionReason::TestChanged { test: test.clone() },
            ));
        }
        diff.changed.insert(key.clone(), new.clone());
        diff.affected_tests.insert(key.clone(), changed_tests);
    }

    diff
}
