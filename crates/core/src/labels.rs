//! Pull request label reconciliation.
//!
//! Computes the label set implied by the areas a PR's changed files touch
//! and converges the PR's current labels onto it. Only labels under the
//! managed prefixes (`area:`, `team:`) are ever added or removed.

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::error::Result;
use crate::matcher;
use crate::platform::{LabelStore, PullRequestFiles};
use crate::schema::AreaDefinition;

/// Label namespaces owned by the reconciler. Anything else on the PR is
/// left untouched.
pub const MANAGED_PREFIXES: [&str; 2] = ["area:", "team:"];

/// True iff at least one changed file matches at least one of the area's
/// patterns. An area with no patterns never matches.
pub fn area_matches(area: &AreaDefinition, changed_files: &[String]) -> bool {
    if area.file_patterns.is_empty() {
        return false;
    }
    for file in changed_files {
        for pattern in &area.file_patterns {
            if matcher::matches(file, pattern) {
                debug!(file = %file, pattern = %pattern, "file matches pattern");
                return true;
            }
        }
    }
    false
}

/// Compute the labels a PR should carry: `area:<name>` for every matched
/// area plus `team:<slug>` for each of that area's reviewer teams.
/// Insertion order follows area load order, so add batches are
/// deterministic.
pub fn desired_labels(areas: &[AreaDefinition], changed_files: &[String]) -> IndexSet<String> {
    let mut labels = IndexSet::new();
    for area in areas {
        if area_matches(area, changed_files) {
            debug!(area = %area.name, "matched area");
            labels.insert(format!("area:{}", area.name));
            for slug in area.reviewers.keys() {
                labels.insert(format!("team:{slug}"));
            }
        }
    }
    labels
}

/// The minimal mutations that converge current labels onto desired ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl LabelDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff desired labels against the PR's current labels.
///
/// `to_add` is desired minus current; `to_remove` is restricted to current
/// labels under a managed prefix that are no longer desired.
pub fn compute_diff(desired: &IndexSet<String>, current: &[String]) -> LabelDiff {
    let to_add = desired
        .iter()
        .filter(|label| !current.contains(*label))
        .cloned()
        .collect();

    let to_remove = current
        .iter()
        .filter(|label| MANAGED_PREFIXES.iter().any(|p| label.starts_with(p)))
        .filter(|label| !desired.contains(*label))
        .cloned()
        .collect();

    LabelDiff { to_add, to_remove }
}

/// Drives label reconciliation for one pull request.
pub struct LabelReconciler<'a> {
    files: &'a dyn PullRequestFiles,
    labels: &'a dyn LabelStore,
}

impl<'a> LabelReconciler<'a> {
    pub fn new(files: &'a dyn PullRequestFiles, labels: &'a dyn LabelStore) -> Self {
        Self { files, labels }
    }

    /// Fetch the PR's changed files, compute the desired label set, and
    /// apply the diff.
    pub async fn process_pr(&self, pr_number: u64, areas: &[AreaDefinition]) -> Result<()> {
        info!(pr = pr_number, "processing pull request");
        let changed_files = self.files.changed_files(pr_number).await?;
        info!(pr = pr_number, files = changed_files.len(), "fetched changed files");

        let desired = desired_labels(areas, &changed_files);
        self.apply(pr_number, &desired).await
    }

    /// Converge the PR's labels onto `desired`. Additions are batched;
    /// removals are issued one label at a time.
    pub async fn apply(&self, pr_number: u64, desired: &IndexSet<String>) -> Result<()> {
        let current = self.labels.list_labels(pr_number).await?;
        let diff = compute_diff(desired, &current);

        if diff.is_empty() {
            info!(pr = pr_number, "no label changes needed");
            return Ok(());
        }

        if !diff.to_add.is_empty() {
            info!(pr = pr_number, labels = ?diff.to_add, "adding labels");
            self.labels.add_labels(pr_number, &diff.to_add).await?;
        }

        for label in &diff.to_remove {
            info!(pr = pr_number, label = %label, "removing label");
            self.labels.remove_label(pr_number, label).await?;
        }

        Ok(())
    }
}
