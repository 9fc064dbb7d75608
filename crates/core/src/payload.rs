//! Branch-protection ruleset payload types and builder.
//!
//! Wire shapes for the platform's repository ruleset API. The payload shape
//! is fixed: branch target, active enforcement, default-branch condition,
//! and a single `pull_request` rule whose base approval count is zero —
//! team-specific minimums are carried by `required_reviewers` instead.

use serde::{Deserialize, Serialize};

use crate::schema::{AreaDefinition, BypassActorType, BypassMode};

/// Namespace prefix for rulesets owned by this tool.
pub const AREA_RULESET_PREFIX: &str = "area:";

/// Symbolic ref the platform expands to the repository's default branch.
pub const DEFAULT_BRANCH_REF: &str = "~DEFAULT_BRANCH";

/// Complete ruleset create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetPayload {
    pub name: String,
    pub target: RulesetTarget,
    pub source_type: String,
    pub source: String,
    pub enforcement: Enforcement,
    pub conditions: RulesetConditions,
    pub rules: Vec<RulesetRule>,
    pub bypass_actors: Vec<BypassActor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetTarget {
    Branch,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Active,
    Disabled,
    Evaluate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetConditions {
    pub ref_name: RefNameCondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefNameCondition {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetRule {
    #[serde(rename = "type")]
    pub kind: String,
    pub parameters: PullRequestParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestParameters {
    pub required_approving_review_count: u32,
    pub dismiss_stale_reviews_on_push: bool,
    pub require_code_owner_review: bool,
    pub require_last_push_approval: bool,
    pub required_review_thread_resolution: bool,
    pub required_reviewers: Vec<RequiredReviewer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredReviewer {
    pub minimum_approvals: u32,
    pub file_patterns: Vec<String>,
    pub reviewer: ReviewerRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerRef {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassActor {
    pub actor_id: u64,
    pub actor_type: BypassActorType,
    pub bypass_mode: BypassMode,
}

/// Project one area definition into its ruleset payload.
///
/// Pure and deterministic: the same area and repository always produce the
/// same payload. Reviewer and bypass orders follow the area's declaration
/// order.
pub fn build_payload(area: &AreaDefinition, repository: &str) -> RulesetPayload {
    let required_reviewers = area
        .reviewers
        .values()
        .map(|rule| RequiredReviewer {
            minimum_approvals: rule.minimum_approvals,
            file_patterns: area.file_patterns.clone(),
            reviewer: ReviewerRef {
                id: rule.team_id,
                kind: "Team".to_string(),
            },
        })
        .collect();

    let bypass_actors = area
        .bypass_rules
        .iter()
        .map(|rule| BypassActor {
            actor_id: rule.actor_id,
            actor_type: rule.actor_type,
            bypass_mode: rule.bypass_mode,
        })
        .collect();

    RulesetPayload {
        name: format!("{AREA_RULESET_PREFIX}{}", area.name),
        target: RulesetTarget::Branch,
        source_type: "Repository".to_string(),
        source: repository.to_string(),
        enforcement: Enforcement::Active,
        conditions: RulesetConditions {
            ref_name: RefNameCondition {
                exclude: Vec::new(),
                include: vec![DEFAULT_BRANCH_REF.to_string()],
            },
        },
        rules: vec![RulesetRule {
            kind: "pull_request".to_string(),
            parameters: PullRequestParameters {
                required_approving_review_count: 0,
                dismiss_stale_reviews_on_push: false,
                require_code_owner_review: false,
                require_last_push_approval: false,
                required_review_thread_resolution: false,
                required_reviewers,
            },
        }],
        bypass_actors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BypassRule, ReviewerRule};
    use indexmap::IndexMap;

    fn sample_area() -> AreaDefinition {
        let mut reviewers = IndexMap::new();
        reviewers.insert(
            "docs-team".to_string(),
            ReviewerRule {
                minimum_approvals: 2,
                team_id: 42,
            },
        );
        reviewers.insert(
            "infra-team".to_string(),
            ReviewerRule {
                minimum_approvals: 0,
                team_id: 7,
            },
        );

        AreaDefinition {
            name: "docs".to_string(),
            description: Some("Documentation".to_string()),
            file_patterns: vec!["docs/**".to_string(), ".areas/docs.yml".to_string()],
            reviewers,
            bypass_rules: vec![
                BypassRule {
                    actor_type: BypassActorType::RepositoryRole,
                    actor_id: 5,
                    bypass_mode: BypassMode::Always,
                },
                BypassRule {
                    actor_type: BypassActorType::Integration,
                    actor_id: 9,
                    bypass_mode: BypassMode::PullRequest,
                },
            ],
        }
    }

    #[test]
    fn one_required_reviewer_per_reviewer_key_with_full_patterns() {
        let area = sample_area();
        let payload = build_payload(&area, "acme/widgets");

        let reviewers = &payload.rules[0].parameters.required_reviewers;
        assert_eq!(reviewers.len(), area.reviewers.len());
        for entry in reviewers {
            assert_eq!(entry.file_patterns, area.file_patterns);
            assert_eq!(entry.reviewer.kind, "Team");
        }
        assert_eq!(reviewers[0].reviewer.id, 42);
        assert_eq!(reviewers[0].minimum_approvals, 2);
        assert_eq!(reviewers[1].reviewer.id, 7);
        assert_eq!(reviewers[1].minimum_approvals, 0);
    }

    #[test]
    fn fixed_shape_fields() {
        let payload = build_payload(&sample_area(), "acme/widgets");

        assert_eq!(payload.name, "area:docs");
        assert_eq!(payload.target, RulesetTarget::Branch);
        assert_eq!(payload.source_type, "Repository");
        assert_eq!(payload.source, "acme/widgets");
        assert_eq!(payload.enforcement, Enforcement::Active);
        assert_eq!(payload.conditions.ref_name.include, vec![DEFAULT_BRANCH_REF]);
        assert!(payload.conditions.ref_name.exclude.is_empty());
        assert_eq!(payload.rules.len(), 1);
        assert_eq!(payload.rules[0].kind, "pull_request");

        let params = &payload.rules[0].parameters;
        assert_eq!(params.required_approving_review_count, 0);
        assert!(!params.dismiss_stale_reviews_on_push);
        assert!(!params.require_code_owner_review);
        assert!(!params.require_last_push_approval);
        assert!(!params.required_review_thread_resolution);
    }

    #[test]
    fn bypass_actors_preserve_order_and_vocabulary() {
        let payload = build_payload(&sample_area(), "acme/widgets");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["target"], "branch");
        assert_eq!(value["enforcement"], "active");
        assert_eq!(value["rules"][0]["type"], "pull_request");
        assert_eq!(
            value["bypass_actors"],
            serde_json::json!([
                { "actor_id": 5, "actor_type": "RepositoryRole", "bypass_mode": "always" },
                { "actor_id": 9, "actor_type": "Integration", "bypass_mode": "pull_request" },
            ])
        );
    }

    #[test]
    fn build_is_deterministic() {
        let area = sample_area();
        assert_eq!(build_payload(&area, "acme/w"), build_payload(&area, "acme/w"));
    }
}
