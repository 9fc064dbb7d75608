//! Declarative repository ownership areas.
//!
//! This crate provides:
//! - YAML area definitions with serde deserialization and identity resolution
//! - A pure fnmatch-style path matcher with GitHub-compatible semantics
//! - Bypass rule grammar parsing (`team/...`, `role/...`, `integration/...`)
//! - Label reconciliation for pull requests (desired vs. current diffing)
//! - Branch-protection ruleset payload building and create/update/delete sync
//!
//! Platform interactions (team lookup, label and ruleset CRUD, PR file
//! listing) go through the traits in [`platform`]; concrete clients live in
//! downstream crates.

pub mod bypass;
pub mod error;
pub mod labels;
pub mod loader;
pub mod matcher;
pub mod payload;
pub mod platform;
pub mod ruleset;
pub mod schema;

pub use error::{AreaError, Result};
pub use labels::{compute_diff, desired_labels, LabelDiff, LabelReconciler};
pub use loader::{discover_area_files, AreaLoader};
pub use payload::{build_payload, RulesetPayload, AREA_RULESET_PREFIX};
pub use platform::{LabelStore, PlatformRuleset, PullRequestFiles, RulesetStore, TeamResolver};
pub use ruleset::RulesetReconciler;
pub use schema::{AreaDefinition, BypassActorType, BypassMode, BypassRule, ReviewerRule};
