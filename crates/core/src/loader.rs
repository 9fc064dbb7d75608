//! Area configuration loader.
//!
//! Reads area YAML documents, resolves reviewer and bypass identities, and
//! produces the normalized [`AreaDefinition`] set. Loading is all-or-nothing:
//! any parse, validation, or resolution failure aborts the whole load so a
//! partial area set is never applied.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use crate::bypass::BypassRuleParser;
use crate::error::{AreaError, Result};
use crate::platform::TeamResolver;
use crate::schema::{AreaDefinition, RawAreaDocument, ReviewerRule};

/// Loads area definition files from a single areas directory.
pub struct AreaLoader<'a> {
    areas_dir: PathBuf,
    resolver: &'a dyn TeamResolver,
}

impl<'a> AreaLoader<'a> {
    pub fn new(areas_dir: impl Into<PathBuf>, resolver: &'a dyn TeamResolver) -> Self {
        Self {
            areas_dir: areas_dir.into(),
            resolver,
        }
    }

    /// Discover and load every area file in the areas directory.
    pub async fn load_all(&self) -> Result<Vec<AreaDefinition>> {
        let files = discover_area_files(&self.areas_dir)?;
        self.load_files(&files).await
    }

    /// Load the given area files, preserving input order.
    ///
    /// Area names are derived from file stems and must be unique across the
    /// whole set (`docs.yml` and `docs.yaml` would collide).
    pub async fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<AreaDefinition>> {
        let mut areas = Vec::with_capacity(paths.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(paths.len());

        for path in paths {
            let area = self.load_file(path).await?;
            if !seen.insert(area.name.clone()) {
                return Err(AreaError::Validation(format!(
                    "Duplicate area name '{}' (from '{}')",
                    area.name,
                    path.display()
                )));
            }
            areas.push(area);
        }

        Ok(areas)
    }

    async fn load_file(&self, path: &Path) -> Result<AreaDefinition> {
        let content = fs::read_to_string(path)?;
        // An empty document is a valid area that only owns its own file.
        let raw: RawAreaDocument =
            serde_yaml::from_str::<Option<RawAreaDocument>>(&content)?.unwrap_or_default();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            return Err(AreaError::Validation(format!(
                "Cannot derive an area name from '{}'",
                path.display()
            )));
        }

        info!(area = %name, path = %path.display(), "processing area config");

        // The definition file itself always triggers its own area.
        let mut file_patterns = raw.file_patterns;
        file_patterns.push(self.self_pattern(path));

        let mut reviewers = IndexMap::with_capacity(raw.reviewers.len());
        for (slug, body) in &raw.reviewers {
            let minimum_approvals = body.as_ref().map(|r| r.minimum_approvals).unwrap_or(0);
            let team_id = self.resolver.resolve_team_id(slug).await?;
            reviewers.insert(
                slug.clone(),
                ReviewerRule {
                    minimum_approvals,
                    team_id,
                },
            );
        }

        let parser = BypassRuleParser::new(self.resolver);
        let mut bypass_rules = Vec::with_capacity(raw.review_bypass.len());
        for (key, mode) in &raw.review_bypass {
            bypass_rules.push(parser.parse(key, mode).await?);
        }

        Ok(AreaDefinition {
            name,
            description: raw.description,
            file_patterns,
            reviewers,
            bypass_rules,
        })
    }

    /// Repository-relative path of an area file, e.g. `.areas/docs.yml`.
    fn self_pattern(&self, path: &Path) -> String {
        let dir_name = self
            .areas_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(".");
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        format!("{dir_name}/{file_name}")
    }
}

/// List the `*.yml` / `*.yaml` files directly under an areas directory,
/// sorted by path. Dotfiles and subdirectories are skipped.
pub fn discover_area_files(areas_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(areas_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "yml" || e == "yaml")
            .unwrap_or(false);
        if is_yaml {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
