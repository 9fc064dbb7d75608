//! areas — reconcile repository ownership areas with GitHub.
//!
//! Two commands over the `.areas/` definition directory:
//! - `label-pr` — apply `area:` / `team:` labels to a pull request based on
//!   its changed files
//! - `ruleset-sync` — converge the repository's branch-protection rulesets
//!   onto the loaded area set

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use areas_core::{AreaLoader, LabelReconciler, RulesetReconciler};
use areas_github::{CachingTeamResolver, GithubClient};

// ── CLI ─────────────────────────────────────────────────────────────

/// Repository ownership area reconciler.
#[derive(Parser, Debug)]
#[command(name = "areas", version, about)]
struct Cli {
    /// GitHub API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repository in `owner/repo` form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Directory containing the `.areas` configuration directory.
    #[arg(long, default_value = ".")]
    working_directory: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply area and team labels to a pull request.
    LabelPr {
        /// Pull request number.
        #[arg(long)]
        pr: u64,
    },
    /// Create, update, and prune branch-protection rulesets.
    RulesetSync,
}

// ── Entry point ─────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (owner, repo) = cli
        .repository
        .split_once('/')
        .context("--repository must be in `owner/repo` form")?;

    let client = GithubClient::new(cli.token.clone(), owner, repo);
    let resolver = CachingTeamResolver::new(client.clone());

    let areas_dir = cli.working_directory.join(".areas");
    let loader = AreaLoader::new(&areas_dir, &resolver);
    let areas = loader.load_all().await?;
    info!(count = areas.len(), dir = %areas_dir.display(), "loaded area definitions");

    match cli.command {
        Commands::LabelPr { pr } => {
            LabelReconciler::new(&client, &client)
                .process_pr(pr, &areas)
                .await?;
        }
        Commands::RulesetSync => {
            RulesetReconciler::new(&client, client.repository())
                .sync(&areas)
                .await?;
        }
    }

    Ok(())
}
