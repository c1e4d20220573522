//! Change detection between a baseline and a candidate revision.
//!
//! This module provides:
//! - Configuration corpus diffing with test-level precision (`config` submodule)
//! - Presubmit and periodic affected-set resolution (`presubmits`, `periodics`)
//! - Mapping of changed configurations onto generated jobs (`derived`)
//! - Cluster-profile consumers (`cluster_profile`)
//!
//! Every entry point is pure: it borrows its inputs, returns the selection plus the
//! [`SelectionEvent`]s explaining it, and logs nothing.

pub mod cluster_profile;
pub mod config;
pub mod derived;
pub mod periodics;
pub mod presubmits;

use serde::Serialize;

use crate::domain::{Info, Periodics, Postsubmit, Presubmits, SelectionEvent};

/// Presubmits chosen by one selection policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresubmitSelection {
    pub selected: Presubmits,
    pub events: Vec<SelectionEvent>,
}

/// Periodics chosen by the periodic resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodicSelection {
    pub selected: Periodics,
    pub events: Vec<SelectionEvent>,
}

/// A postsubmit together with the configuration it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostsubmitInContext {
    pub info: Info,
    pub job: Postsubmit,
}

/// Postsubmits chosen by the derived-job mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsubmitSelection {
    pub selected: Vec<PostsubmitInContext>,
    pub events: Vec<SelectionEvent>,
}
