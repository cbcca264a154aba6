//! Error types for cutrelease modules using thiserror.

use thiserror::Error;

use crate::version::IncrementType;

/// Errors from local git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to resolve HEAD: {0}")]
    HeadNotFound(#[source] git2::Error),

    #[error("HEAD is detached; pass --branch to name the release branch")]
    DetachedHead,

    #[error("No 'origin' remote found: {0}")]
    RemoteNotFound(#[source] git2::Error),

    #[error("Remote 'origin' has no URL")]
    RemoteWithoutUrl,

    #[error("Reference '{0}' is not a branch")]
    NotABranch(String),
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("GitHub request '{operation}' failed: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Rate limited by GitHub API while running '{operation}'")]
    RateLimited { operation: &'static str },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Failed to parse repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("Failed to decode content of '{path}': {reason}")]
    InvalidContent { path: String, reason: String },
}

/// Errors from release configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse release configuration '{path}': {source}")]
    InvalidYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown increment type '{value}' in category '{category}'")]
    UnknownIncrementType { category: String, value: String },
}

/// Errors from version parsing, comparison and incrementing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Failed to parse version '{text}': {reason}")]
    Parse { text: String, reason: String },

    #[error("Unsupported versioning scheme '{0}', expected 'semver' or 'calver'")]
    UnsupportedScheme(String),

    #[error("Cannot compare a {left} version with a {right} version")]
    IncompatibleVersionTypes {
        left: &'static str,
        right: &'static str,
    },

    #[error("Unsupported increment type '{0}'")]
    UnsupportedIncrementType(String),

    #[error("Cannot increment {field} of '{version}': counter is at its maximum")]
    Overflow {
        version: String,
        field: &'static str,
    },

    #[error("Increment type '{increment}' does not apply to {version_type} versions")]
    IncrementNotApplicable {
        increment: IncrementType,
        version_type: &'static str,
    },
}

impl VersionError {
    pub(crate) fn parse(text: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from release asset handling.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to read asset file '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Asset path '{0}' has no file name")]
    MissingFileName(String),
}

/// Errors from the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Failed to write action outputs: {0}")]
    OutputFailed(#[source] std::io::Error),
}
