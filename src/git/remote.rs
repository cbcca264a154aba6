//! Local repository lookups used when the run context is not given explicitly.

use git2::Repository;

use crate::error::GitError;

/// URL of the `origin` remote.
pub fn origin_url(repo: &Repository) -> Result<String, GitError> {
    let remote = repo.find_remote("origin").map_err(GitError::RemoteNotFound)?;
    remote
        .url()
        .map(str::to_string)
        .ok_or(GitError::RemoteWithoutUrl)
}

/// Full SHA of the commit HEAD points to.
pub fn head_sha(repo: &Repository) -> Result<String, GitError> {
    let commit = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(GitError::HeadNotFound)?;
    Ok(commit.id().to_string())
}
