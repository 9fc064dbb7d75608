//! Area document schema: raw YAML shapes and the normalized model.
//!
//! Raw types mirror what is authored in `.areas/*.yml`; they are normalized
//! into [`AreaDefinition`] at the load boundary so nothing downstream has to
//! branch on optional or null-bodied fields.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Raw document (as authored) ──────────────────────────────────────

/// One area definition file, before identity resolution.
///
/// ```yaml
/// description: Documentation
/// file_patterns:
///   - docs/**
/// reviewers:
///   docs-team:
///     minimum_approvals: 2
///   another-team:          # null body, defaults apply
/// review_bypass:
///   release-bot: always
///   role/5: pull_request
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAreaDocument {
    pub description: Option<String>,
    #[serde(default)]
    pub file_patterns: Vec<String>,
    #[serde(default)]
    pub reviewers: IndexMap<String, Option<RawReviewer>>,
    #[serde(default)]
    pub review_bypass: IndexMap<String, String>,
}

/// Reviewer body as authored. A null body means "declared with defaults".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReviewer {
    #[serde(default)]
    pub minimum_approvals: u32,
}

// ── Normalized model ────────────────────────────────────────────────

/// A fully loaded ownership area.
///
/// `file_patterns` always ends with the area's own config file path, so a
/// change to the definition itself re-triggers the area. Reviewer and bypass
/// orders are declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaDefinition {
    pub name: String,
    pub description: Option<String>,
    pub file_patterns: Vec<String>,
    pub reviewers: IndexMap<String, ReviewerRule>,
    pub bypass_rules: Vec<BypassRule>,
}

/// Review requirement for one team, immutable after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewerRule {
    pub minimum_approvals: u32,
    pub team_id: u64,
}

/// Identity kind permitted to bypass review. Serialized with the GitHub
/// wire vocabulary (`Team`, `RepositoryRole`, `Integration`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BypassActorType {
    Team,
    RepositoryRole,
    Integration,
}

impl fmt::Display for BypassActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BypassActorType::Team => write!(f, "Team"),
            BypassActorType::RepositoryRole => write!(f, "RepositoryRole"),
            BypassActorType::Integration => write!(f, "Integration"),
        }
    }
}

/// When a bypass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassMode {
    Always,
    PullRequest,
    Exempt,
}

impl fmt::Display for BypassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BypassMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BypassMode::Always => "always",
            BypassMode::PullRequest => "pull_request",
            BypassMode::Exempt => "exempt",
        }
    }
}

impl FromStr for BypassMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "always" => Ok(BypassMode::Always),
            "pull_request" => Ok(BypassMode::PullRequest),
            "exempt" => Ok(BypassMode::Exempt),
            other => Err(format!("unknown bypass mode: '{other}'")),
        }
    }
}

/// One normalized bypass entry. Duplicate actors are legitimate (the same
/// team can appear under several modes), so these live in an ordered
/// sequence rather than a keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassRule {
    pub actor_type: BypassActorType,
    pub actor_id: u64,
    pub bypass_mode: BypassMode,
}
