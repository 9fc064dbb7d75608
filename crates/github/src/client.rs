//! GitHub REST API client implementing the platform collaborator traits.

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use areas_core::error::{AreaError, Result};
use areas_core::payload::RulesetPayload;
use areas_core::platform::{
    LabelStore, PlatformRuleset, PullRequestFiles, RulesetStore, TeamResolver,
};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("areas/", env!("CARGO_PKG_VERSION"));
const FILES_PER_PAGE: usize = 100;

// ── Response shapes ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Team {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct PullFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

// ── Client ──────────────────────────────────────────────────────────

/// Authenticated GitHub API client scoped to one repository.
///
/// The team resolver treats the repository owner as the organization.
/// Cheap to clone: the underlying `reqwest::Client` shares its connection
/// pool.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token, owner, repo)
    }

    /// Point the client at a non-default API host (GitHub Enterprise, test
    /// servers).
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Full `owner/repo` identifier.
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, USER_AGENT)
    }

    /// Send a request, mapping transport errors and non-2xx responses to
    /// [`AreaError::Platform`] with the status and body attached.
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AreaError::Platform(format!("{what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AreaError::Platform(format!("{what}: {status}: {body}")));
        }

        debug!(what, status = %status, "github request succeeded");
        Ok(response)
    }
}

// ── Trait implementations ───────────────────────────────────────────

#[async_trait]
impl TeamResolver for GithubClient {
    async fn resolve_team_id(&self, slug: &str) -> Result<u64> {
        let org = &self.owner;
        let path = format!("/orgs/{org}/teams/{slug}");
        let fail = |detail: String| {
            AreaError::Resolution(format!(
                "Failed to resolve team ID for slug '{org}/{slug}': {detail}"
            ))
        };

        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return Err(fail(format!("{status}")));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(fail(format!("{status}: {body}")));
        }

        let team: Team = response.json().await.map_err(|e| fail(e.to_string()))?;
        debug!(org = %org, slug = %slug, team_id = team.id, "resolved team");
        Ok(team.id)
    }
}

#[async_trait]
impl PullRequestFiles for GithubClient {
    async fn changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        let path = format!(
            "/repos/{}/{}/pulls/{pr_number}/files",
            self.owner, self.repo
        );

        let mut files = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .send(
                    self.request(Method::GET, &path).query(&[
                        ("per_page", FILES_PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ]),
                    "listing pull request files",
                )
                .await?;

            let batch: Vec<PullFile> = response
                .json()
                .await
                .map_err(|e| AreaError::Platform(format!("decoding pull request files: {e}")))?;
            let len = batch.len();
            files.extend(batch.into_iter().map(|f| f.filename));

            if len < FILES_PER_PAGE {
                return Ok(files);
            }
            page += 1;
        }
    }
}

#[async_trait]
impl LabelStore for GithubClient {
    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>> {
        let path = format!(
            "/repos/{}/{}/issues/{pr_number}/labels",
            self.owner, self.repo
        );
        let response = self
            .send(self.request(Method::GET, &path), "listing labels")
            .await?;
        let labels: Vec<Label> = response
            .json()
            .await
            .map_err(|e| AreaError::Platform(format!("decoding labels: {e}")))?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/issues/{pr_number}/labels",
            self.owner, self.repo
        );
        self.send(
            self.request(Method::POST, &path)
                .json(&serde_json::json!({ "labels": labels })),
            "adding labels",
        )
        .await?;
        Ok(())
    }

    async fn remove_label(&self, pr_number: u64, label: &str) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/issues/{pr_number}/labels/{label}",
            self.owner, self.repo
        );
        self.send(self.request(Method::DELETE, &path), "removing label")
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RulesetStore for GithubClient {
    async fn list_rulesets(&self) -> Result<Vec<PlatformRuleset>> {
        let path = format!("/repos/{}/{}/rulesets", self.owner, self.repo);
        let response = self
            .send(self.request(Method::GET, &path), "listing rulesets")
            .await?;
        response
            .json()
            .await
            .map_err(|e| AreaError::Platform(format!("decoding rulesets: {e}")))
    }

    async fn create_ruleset(&self, payload: &RulesetPayload) -> Result<()> {
        let path = format!("/repos/{}/{}/rulesets", self.owner, self.repo);
        self.send(
            self.request(Method::POST, &path).json(payload),
            "creating ruleset",
        )
        .await?;
        Ok(())
    }

    async fn update_ruleset(&self, ruleset_id: u64, payload: &RulesetPayload) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/rulesets/{ruleset_id}",
            self.owner, self.repo
        );
        self.send(
            self.request(Method::PUT, &path).json(payload),
            "updating ruleset",
        )
        .await?;
        Ok(())
    }

    async fn delete_ruleset(&self, ruleset_id: u64) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/rulesets/{ruleset_id}",
            self.owner, self.repo
        );
        self.send(self.request(Method::DELETE, &path), "deleting ruleset")
            .await?;
        Ok(())
    }
}
