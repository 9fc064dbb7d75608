//! Grammar parser for `review_bypass` entries.
//!
//! A bypass key is `prefix/identifier`, where the prefix selects the actor
//! type. A bare key (no `/`) is shorthand for `team/<key>`. The mode value
//! must be one of `always`, `pull_request`, `exempt`.

use crate::error::{AreaError, Result};
use crate::platform::TeamResolver;
use crate::schema::{BypassActorType, BypassMode, BypassRule};

const VALID_ACTOR_PREFIXES: &[&str] = &["team", "role", "integration"];
const VALID_BYPASS_MODES: &[&str] = &["always", "pull_request", "exempt"];

/// Recognized actor prefix, before identifier interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorPrefix {
    Team,
    Role,
    Integration,
}

/// Parses raw `key: mode` pairs into typed [`BypassRule`]s, resolving team
/// references through the injected resolver.
pub struct BypassRuleParser<'a> {
    resolver: &'a dyn TeamResolver,
}

impl<'a> BypassRuleParser<'a> {
    pub fn new(resolver: &'a dyn TeamResolver) -> Self {
        Self { resolver }
    }

    /// Parse one `key: mode` pair.
    ///
    /// The mode is validated after the prefix is recognized but before the
    /// identifier is interpreted; every error message references the
    /// original key.
    pub async fn parse(&self, key: &str, mode: &str) -> Result<BypassRule> {
        let (prefix, identifier) = parse_key(key)?;

        let bypass_mode: BypassMode = mode.parse().map_err(|_| {
            AreaError::Validation(format!(
                "Invalid bypass mode '{mode}' for '{key}'. Valid modes are: {}",
                VALID_BYPASS_MODES.join(", ")
            ))
        })?;

        let (actor_id, actor_type) = match prefix {
            ActorPrefix::Team => (
                self.resolver.resolve_team_id(&identifier).await?,
                BypassActorType::Team,
            ),
            ActorPrefix::Role => {
                let id = identifier.parse::<u64>().map_err(|_| {
                    AreaError::Validation(format!(
                        "Invalid role ID '{identifier}' in '{key}': role ID must be a number"
                    ))
                })?;
                (id, BypassActorType::RepositoryRole)
            }
            ActorPrefix::Integration => {
                let id = identifier.parse::<u64>().map_err(|_| {
                    AreaError::Validation(format!(
                        "Invalid integration ID '{identifier}' in '{key}': integration ID must be a number"
                    ))
                })?;
                (id, BypassActorType::Integration)
            }
        };

        Ok(BypassRule {
            actor_type,
            actor_id,
            bypass_mode,
        })
    }
}

/// Split a key into its actor prefix and identifier.
fn parse_key(key: &str) -> Result<(ActorPrefix, String)> {
    // no prefix defaults to team
    let Some((raw_prefix, identifier)) = key.split_once('/') else {
        return Ok((ActorPrefix::Team, key.to_string()));
    };

    let prefix = match raw_prefix.to_lowercase().as_str() {
        "team" => ActorPrefix::Team,
        "role" => ActorPrefix::Role,
        "integration" => ActorPrefix::Integration,
        other => {
            return Err(AreaError::Validation(format!(
                "Invalid review_bypass actor type '{other}' in '{key}'. Valid types are: {}",
                VALID_ACTOR_PREFIXES.join(", ")
            )))
        }
    };

    if identifier.is_empty() {
        return Err(AreaError::Validation(format!(
            "Invalid review_bypass key '{key}': identifier after '{}/' cannot be empty",
            raw_prefix.to_lowercase()
        )));
    }

    Ok((prefix, identifier.to_string()))
}
