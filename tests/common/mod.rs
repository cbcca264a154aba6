//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use cutrelease::git::{ConventionalCommit, RawCommit, classify};
use git2::{Oid, Repository, Signature};
use octocrab::Octocrab;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Classify a commit message with a synthetic hash.
pub fn commit(message: &str) -> ConventionalCommit {
    classify(&RawCommit::new("0000000", message))
}

/// Classify several commit messages.
pub fn commits(messages: &[&str]) -> Vec<ConventionalCommit> {
    messages.iter().map(|m| commit(m)).collect()
}

/// Helper to create an octocrab client pointing to a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// Minimal release object as returned by the GitHub API.
pub fn release_json(id: u64, tag: &str) -> Value {
    json!({
        "id": id,
        "tag_name": tag,
        "name": tag,
        "body": "",
        "draft": false,
        "prerelease": false,
        "target_commitish": "main",
        "html_url": format!("https://github.com/owner/repo/releases/tag/{}", tag),
        "upload_url": format!("https://uploads.github.com/repos/owner/repo/releases/{}/assets{{?name,label}}", id),
    })
}

/// Minimal commit object as returned by the GitHub API.
pub fn commit_json(sha: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "commit": { "message": message },
    })
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();

        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, message).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch at `oid` and make it the checked-out branch.
    pub fn checkout_branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, true)
            .expect("Failed to create branch");
        self.repo
            .set_head(&format!("refs/heads/{}", name))
            .expect("Failed to set HEAD");
    }

    /// Point HEAD directly at a commit.
    pub fn detach(&self, oid: Oid) {
        self.repo.set_head_detached(oid).expect("Failed to detach HEAD");
    }

    /// Add an `origin` remote.
    pub fn set_origin(&self, url: &str) {
        self.repo
            .remote("origin", url)
            .expect("Failed to add origin remote");
    }
}
