//! `ReleaseHost` implementation backed by octocrab.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use futures::TryStreamExt;
use octocrab::Octocrab;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{Comparison, CommitRecord, FileContent};
use super::{Asset, NewRelease, ReleaseHost, RepositoryId, Release};
use crate::error::GitHubError;
use crate::git::RawCommit;

const PER_PAGE: u8 = 100;

/// Safety limit to prevent infinite pagination loops.
const MAX_PAGES: u32 = 50;

#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    per_page: u8,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RefQuery<'a> {
    #[serde(rename = "ref")]
    reference: &'a str,
}

/// GitHub REST client scoped to one repository.
pub struct GitHubClient {
    octocrab: Octocrab,
    repository: RepositoryId,
}

impl GitHubClient {
    /// Build a client authenticated with a personal or workflow token.
    pub fn new(token: &str, repository: RepositoryId) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(octocrab, repository))
    }

    /// Use a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(octocrab: Octocrab, repository: RepositoryId) -> Self {
        Self {
            octocrab,
            repository,
        }
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    fn route(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.repository.owner, self.repository.name, path
        )
    }

    fn request_error(&self, operation: &'static str, error: octocrab::Error) -> GitHubError {
        // Check error content using both Display and Debug output
        // to handle different octocrab error formats
        let display = error.to_string().to_lowercase();
        let debug = format!("{:?}", error).to_lowercase();

        if display.contains("rate limit") || debug.contains("rate limit") {
            return GitHubError::RateLimited { operation };
        }

        GitHubError::Request {
            operation,
            source: Box::new(error),
        }
    }

    /// Fetch every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        route: &str,
        sha: Option<&str>,
    ) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let query = PageQuery {
                per_page: PER_PAGE,
                page,
                sha,
            };
            let batch: Vec<T> = self
                .octocrab
                .get(route, Some(&query))
                .await
                .map_err(|e| self.map_not_found(operation, e))?;

            let count = batch.len();
            items.extend(batch);
            if count < usize::from(PER_PAGE) {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while running '{}' for {}",
                    MAX_PAGES, operation, self.repository
                );
                break;
            }
        }

        Ok(items)
    }

    fn map_not_found(&self, operation: &'static str, error: octocrab::Error) -> GitHubError {
        if status_code(&error) == Some(404) {
            return GitHubError::RepositoryNotFound {
                owner: self.repository.owner.clone(),
                repo: self.repository.name.clone(),
            };
        }
        self.request_error(operation, error)
    }
}

fn status_code(error: &octocrab::Error) -> Option<u16> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

#[async_trait]
impl ReleaseHost for GitHubClient {
    async fn list_releases(&self) -> Result<Vec<Release>, GitHubError> {
        let releases: Vec<Release> = self
            .get_all("list releases", &self.route("/releases"), None)
            .await?;
        debug!("Fetched {} releases from {}", releases.len(), self.repository);
        Ok(releases)
    }

    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>, GitHubError> {
        let route = self.route(&format!("/releases/tags/{}", tag));
        match self.octocrab.get(route, None::<&()>).await {
            Ok(release) => Ok(Some(release)),
            Err(e) if status_code(&e) == Some(404) => Ok(None),
            Err(e) => Err(self.request_error("get release by tag", e)),
        }
    }

    async fn get_release_by_name(&self, name: &str) -> Result<Option<Release>, GitHubError> {
        // GitHub has no lookup by name; drafts only show up in the listing.
        let releases = self.list_releases().await?;
        Ok(releases
            .into_iter()
            .find(|r| r.name.as_deref() == Some(name)))
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release, GitHubError> {
        self.octocrab
            .post(self.route("/releases"), Some(release))
            .await
            .map_err(|e| self.request_error("create release", e))
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<RawCommit>, GitHubError> {
        let route = self.route(&format!("/compare/{}...{}", base, head));
        let mut commits = Vec::new();
        let mut page = 1u32;

        loop {
            let query = PageQuery {
                per_page: PER_PAGE,
                page,
                sha: None,
            };
            let comparison: Comparison = self
                .octocrab
                .get(&route, Some(&query))
                .await
                .map_err(|e| self.request_error("compare commits", e))?;

            let count = comparison.commits.len();
            commits.extend(comparison.commits.into_iter().map(RawCommit::from));
            if count < usize::from(PER_PAGE) {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit comparing {}...{}",
                    MAX_PAGES, base, head
                );
                break;
            }
        }

        Ok(commits)
    }

    async fn list_commits(&self, reference: &str) -> Result<Vec<RawCommit>, GitHubError> {
        let records: Vec<CommitRecord> = self
            .get_all("list commits", &self.route("/commits"), Some(reference))
            .await?;
        Ok(records.into_iter().map(RawCommit::from).collect())
    }

    async fn get_file_content(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<Option<Vec<u8>>, GitHubError> {
        let route = self.route(&format!("/contents/{}", path));
        let query = RefQuery { reference };
        let file: FileContent = match self.octocrab.get(route, Some(&query)).await {
            Ok(file) => file,
            Err(e) if status_code(&e) == Some(404) => return Ok(None),
            Err(e) => return Err(self.request_error("get file content", e)),
        };

        let invalid = |reason: String| GitHubError::InvalidContent {
            path: path.to_string(),
            reason,
        };

        match file.encoding.as_deref() {
            Some("base64") => {}
            other => {
                return Err(invalid(format!(
                    "unsupported encoding {}",
                    other.unwrap_or("none")
                )));
            }
        }

        // GitHub wraps base64 content at 60 columns.
        let encoded: String = file
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        STANDARD
            .decode(encoded)
            .map(Some)
            .map_err(|e| invalid(e.to_string()))
    }

    async fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>, GitHubError> {
        self.get_all(
            "list assets",
            &self.route(&format!("/releases/{}/assets", release_id)),
            None,
        )
        .await
    }

    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        label: Option<String>,
        data: Vec<u8>,
    ) -> Result<Asset, GitHubError> {
        let repos = self
            .octocrab
            .repos(&self.repository.owner, &self.repository.name);
        let releases = repos.releases();
        let mut upload = releases.upload_asset(release_id, name, Bytes::from(data));
        if let Some(label) = label.as_deref() {
            upload = upload.label(label);
        }

        let asset = upload
            .send()
            .await
            .map_err(|e| self.request_error("upload asset", e))?;

        Ok(Asset {
            id: asset.id.into_inner(),
            name: asset.name,
            label: asset.label,
            size: u64::try_from(asset.size).unwrap_or_default(),
        })
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<(), GitHubError> {
        self.octocrab
            .repos(&self.repository.owner, &self.repository.name)
            .release_assets()
            .delete(asset_id)
            .await
            .map_err(|e| self.request_error("delete asset", e))
    }

    async fn download_asset(&self, asset_id: u64) -> Result<Vec<u8>, GitHubError> {
        let stream = self
            .octocrab
            .repos(&self.repository.owner, &self.repository.name)
            .release_assets()
            .stream(asset_id)
            .await
            .map_err(|e| self.request_error("download asset", e))?;
        let mut stream = Box::pin(stream);

        let mut data = Vec::new();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| self.request_error("download asset", e))?
        {
            data.extend_from_slice(&chunk);
        }

        Ok(data)
    }
}
