//! Git-side context: branch resolution, commit classification and local repository
//! lookups using git2-rs.

pub mod branch;
pub mod commits;
pub mod remote;

pub use branch::{Branch, RELEASE_BRANCH_PREFIX};
pub use commits::{ConventionalCommit, RawCommit, classify, classify_all};
pub use remote::{head_sha, origin_url};
