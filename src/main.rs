//! cutrelease - CLI entry point.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use git2::Repository;
use tracing::info;

use cutrelease::config::DEFAULT_CONFIG_PATH;
use cutrelease::error::GitError;
use cutrelease::git::{Branch, head_sha, origin_url};
use cutrelease::github::{GitHubClient, RepositoryId, get_github_token};
use cutrelease::release::{
    ActionOutputs, AssetSpec, ReleaseOutcome, ReleaseSettings, run_release, write_outputs,
};
use cutrelease::version::SystemClock;

/// Cut a GitHub release from the conventional commits since the last one.
#[derive(Parser, Debug)]
#[command(name = "cutrelease")]
#[command(about = "Cut a GitHub release from conventional commits")]
#[command(version)]
struct Cli {
    /// Versioning scheme: semver or calver
    #[arg(long, env = "INPUT_VERSIONING", default_value = "semver")]
    versioning: String,

    /// Tag prefix, e.g. "v"
    #[arg(long, env = "INPUT_PREFIX", default_value = "")]
    prefix: String,

    /// Produce pre-releases (-dev.N on the default branch, -rc.N on release branches)
    #[arg(long, env = "INPUT_PRERELEASE")]
    prerelease: bool,

    /// Pipe-delimited increments to apply, e.g. "prerelease|minor" (default: from commits)
    #[arg(long, env = "INPUT_INCREMENT-TYPE")]
    increment_type: Option<String>,

    /// Create the release as a draft
    #[arg(long, env = "INPUT_DRAFT")]
    draft: bool,

    /// Path of the release configuration inside the repository
    #[arg(long = "config", env = "INPUT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config_path: String,

    /// File to attach, as path or path#label (repeatable)
    #[arg(long = "asset", env = "INPUT_ASSETS", value_delimiter = '\n')]
    assets: Vec<AssetSpec>,

    /// Repository as owner/name (default: parsed from the origin remote)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Branch the release is cut from (default: the checked-out branch)
    #[arg(long, env = "GITHUB_REF")]
    branch: Option<String>,

    /// Commit to release (default: HEAD)
    #[arg(long, env = "GITHUB_SHA")]
    target: Option<String>,

    /// GitHub token (default: gh CLI, then GH_TOKEN)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Compute the version and changelog without publishing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries outputs
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }

        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut local = LocalRepository::default();

    let repository: RepositoryId = match cli.repository.as_deref() {
        Some(slug) => slug.parse().context("Invalid --repository")?,
        None => {
            let url = origin_url(local.open()?)?;
            RepositoryId::from_remote_url(&url).context("Could not parse GitHub remote URL")?
        }
    };

    let branch = match cli.branch.as_deref() {
        Some(name) => Branch::from_ref(name).context("Invalid --branch")?,
        None => Branch::current(local.open()?).context("Failed to resolve current branch")?,
    };

    let target = match cli.target {
        Some(sha) => sha,
        None => head_sha(local.open()?).context("Failed to resolve HEAD")?,
    };

    let token = get_github_token(cli.token.as_deref())
        .context("GitHub authentication required to publish releases")?;
    let client = GitHubClient::new(&token, repository)?;
    info!("Repository: {}", client.repository());

    let settings = ReleaseSettings {
        versioning: cli.versioning,
        prefix: Some(cli.prefix).filter(|p| !p.is_empty()),
        prerelease: cli.prerelease,
        increment_type: cli.increment_type.filter(|s| !s.trim().is_empty()),
        draft: cli.draft,
        config_path: cli.config_path,
        assets: cli.assets,
        target,
        branch,
        dry_run: cli.dry_run,
    };

    let outcome = run_release(&settings, &client, &SystemClock)
        .await
        .context("Release failed")?;

    match &outcome {
        ReleaseOutcome::Created { release, .. } => {
            info!("✓ Released {}", release.tag_name);
        }
        ReleaseOutcome::DryRun {
            version, changelog, ..
        } => {
            println!("\n--- Dry Run Output ---\n");
            println!("Version: {}\n", version);
            println!("{}", changelog);
            return Ok(());
        }
        ReleaseOutcome::Skipped { reason, .. } => {
            info!("Nothing released: {}", reason);
        }
    }

    write_outputs(&ActionOutputs::from_outcome(&outcome)?)?;
    Ok(())
}

/// The working-directory repository, opened on first use.
#[derive(Default)]
struct LocalRepository {
    repo: Option<Repository>,
}

impl LocalRepository {
    fn open(&mut self) -> Result<&Repository> {
        if self.repo.is_none() {
            let repo = Repository::discover(".")
                .map_err(GitError::OpenRepository)
                .context("Not a git repository. Pass --repository, --branch and --target explicitly.")?;
            self.repo = Some(repo);
        }
        self.repo.as_ref().context("Repository unavailable")
    }
}
