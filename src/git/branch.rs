//! Branch context: default branch vs. `release/*` branches.

use git2::Repository;

use crate::error::GitError;

/// Branch name prefix that marks a maintenance release branch.
pub const RELEASE_BRANCH_PREFIX: &str = "release/";

/// The branch a release is cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Default {
        name: String,
    },
    Release {
        name: String,
        /// Segment after `release/`, e.g. `1.2` for `release/1.2`.
        modifier: Option<String>,
    },
}

impl Branch {
    /// Classify a branch name or a full `refs/heads/...` reference.
    pub fn from_name(reference: &str) -> Self {
        let name = reference
            .trim()
            .strip_prefix("refs/heads/")
            .unwrap_or(reference.trim())
            .to_string();

        match name.strip_prefix(RELEASE_BRANCH_PREFIX) {
            Some(rest) => {
                let modifier = (!rest.is_empty()).then(|| rest.to_string());
                Self::Release { name, modifier }
            }
            None => Self::Default { name },
        }
    }

    /// Classify a branch name or reference, rejecting refs outside `refs/heads/`
    /// such as tags and pull request merges.
    pub fn from_ref(reference: &str) -> Result<Self, GitError> {
        let trimmed = reference.trim();
        if trimmed.starts_with("refs/") && !trimmed.starts_with("refs/heads/") {
            return Err(GitError::NotABranch(trimmed.to_string()));
        }
        Ok(Self::from_name(trimmed))
    }

    /// Resolve the branch checked out in `repo`.
    pub fn current(repo: &Repository) -> Result<Self, GitError> {
        let head = repo.head().map_err(GitError::HeadNotFound)?;
        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }
        let name = head.shorthand().ok_or(GitError::DetachedHead)?;
        Ok(Self::from_name(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Default { name } | Self::Release { name, .. } => name,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release { .. })
    }

    pub fn modifier(&self) -> Option<&str> {
        match self {
            Self::Release { modifier, .. } => modifier.as_deref(),
            Self::Default { .. } => None,
        }
    }

    /// Pre-release label used for versions cut from this branch.
    pub fn prerelease_label(&self) -> &'static str {
        match self {
            Self::Release { .. } => "rc",
            Self::Default { .. } => "dev",
        }
    }
}
