//! Wire types for the GitHub REST endpoints the release flow touches.

use serde::{Deserialize, Serialize};

use crate::git::RawCommit;

/// A GitHub release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub target_commitish: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub upload_url: Option<String>,
}

/// Request body for creating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    /// `"true"` or `"false"`; GitHub takes this field as a string.
    pub make_latest: String,
    pub target_commitish: String,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitRecord {
    pub sha: String,
    pub commit: CommitDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetails {
    pub message: String,
}

impl From<CommitRecord> for RawCommit {
    fn from(record: CommitRecord) -> Self {
        RawCommit::new(record.sha, record.commit.message)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Comparison {
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}
