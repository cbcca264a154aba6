//! cutrelease - Cut GitHub releases from conventional commits.
//!
//! # Overview
//!
//! cutrelease finds the latest release of a repository, classifies the commits made
//! since, computes the next SemVer or CalVer version and publishes a GitHub release
//! with a categorized changelog.

pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod release;
pub mod scheme;
pub mod version;

// Re-export commonly used types
pub use config::ReleaseConfiguration;
pub use error::{AssetError, ConfigError, GitError, GitHubError, ReleaseError, VersionError};
pub use git::{Branch, ConventionalCommit, RawCommit};
pub use github::{GitHubClient, ReleaseHost, RepositoryId};
pub use release::{ReleaseOutcome, ReleaseSettings, run_release};
pub use scheme::VersionScheme;
pub use version::{CalendarVersion, IncrementType, SemanticVersion, Version};
