//! Platform collaborator traits.
//!
//! Every interaction with the hosting platform is a suspend point behind one
//! of these traits; the core stays single-threaded and deterministic between
//! calls. Concrete implementations (and any retry policy) belong to client
//! crates.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::payload::RulesetPayload;

/// Resolves a human-readable team slug to its stable numeric identity.
///
/// Resolution failure (unknown team, denied access) is fatal for the load
/// that triggered it. Implementations may cache per run; the core calls
/// this once per occurrence of a team reference.
#[async_trait]
pub trait TeamResolver: Send + Sync {
    async fn resolve_team_id(&self, slug: &str) -> Result<u64>;
}

/// Produces the ordered list of file paths touched by a pull request.
/// Pagination is the implementor's concern.
#[async_trait]
pub trait PullRequestFiles: Send + Sync {
    async fn changed_files(&self, pr_number: u64) -> Result<Vec<String>>;
}

/// Label CRUD on a pull request. Additions are batched; the platform only
/// supports removing labels one at a time.
#[async_trait]
pub trait LabelStore: Send + Sync {
    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>>;
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;
    async fn remove_label(&self, pr_number: u64, label: &str) -> Result<()>;
}

/// The only fields of a platform ruleset the reconciler inspects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformRuleset {
    pub id: u64,
    pub name: String,
}

/// Ruleset CRUD for a repository.
#[async_trait]
pub trait RulesetStore: Send + Sync {
    async fn list_rulesets(&self) -> Result<Vec<PlatformRuleset>>;
    async fn create_ruleset(&self, payload: &RulesetPayload) -> Result<()>;
    async fn update_ruleset(&self, ruleset_id: u64, payload: &RulesetPayload) -> Result<()>;
    async fn delete_ruleset(&self, ruleset_id: u64) -> Result<()>;
}
