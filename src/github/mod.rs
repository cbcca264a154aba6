//! GitHub release host: the remote side of the release flow.

pub mod auth;
pub mod client;
pub mod types;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::GitHubError;
use crate::git::RawCommit;

pub use auth::get_github_token;
pub use client::GitHubClient;
pub use types::{Asset, NewRelease, Release};

/// Remote store for releases, commits, repository files and release assets.
///
/// This abstraction allows mocking GitHub in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Every release of the repository, across all pages.
    async fn list_releases(&self) -> Result<Vec<Release>, GitHubError>;

    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>, GitHubError>;

    async fn get_release_by_name(&self, name: &str) -> Result<Option<Release>, GitHubError>;

    async fn create_release(&self, release: &NewRelease) -> Result<Release, GitHubError>;

    /// Commits reachable from `head` but not from `base`, oldest first.
    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<RawCommit>, GitHubError>;

    /// Commits reachable from `reference`, newest first.
    async fn list_commits(&self, reference: &str) -> Result<Vec<RawCommit>, GitHubError>;

    /// Raw bytes of a repository file at `reference`; `None` when it does not exist.
    async fn get_file_content(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<Option<Vec<u8>>, GitHubError>;

    async fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>, GitHubError>;

    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        label: Option<String>,
        data: Vec<u8>,
    ) -> Result<Asset, GitHubError>;

    async fn delete_asset(&self, asset_id: u64) -> Result<(), GitHubError>;

    async fn download_asset(&self, asset_id: u64) -> Result<Vec<u8>, GitHubError>;
}

/// An `owner/name` repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    /// Extract owner and repo from a git remote URL.
    pub fn from_remote_url(url: &str) -> Result<Self, GitHubError> {
        // Handle SSH format: git@github.com:owner/repo.git
        if let Some(path) = url.strip_prefix("git@github.com:") {
            return Self::from_path(path, url);
        }

        // Handle HTTPS format: https://github.com/owner/repo.git
        if let Some(path) = url.split("github.com/").nth(1) {
            return Self::from_path(path, url);
        }

        Err(GitHubError::InvalidRepository(url.to_string()))
    }

    fn from_path(path: &str, original: &str) -> Result<Self, GitHubError> {
        let path = path.strip_suffix(".git").unwrap_or(path);
        let mut parts = path.split('/');

        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(GitHubError::InvalidRepository(original.to_string())),
        }
    }
}

impl FromStr for RepositoryId {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(GitHubError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
