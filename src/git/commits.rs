//! Conventional commit classification.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

// Pattern: type(scope)!: description or type!: description or type(scope): description or type: description
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\(([^)]+)\))?(!)?\s*:\s*(.+)$").expect("commit header regex is valid")
});

/// A commit as returned by the release host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub message: String,
}

impl RawCommit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }
}

/// A commit classified against the conventional-commit header format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    pub hash: String,
    /// Type as written in the header (`feat`, `Fix`, ...); empty when invalid.
    pub commit_type: String,
    pub scope: Option<String>,
    pub description: String,
    pub breaking: bool,
    /// False when the header did not follow `type(scope)!: description`.
    pub is_valid: bool,
}

impl ConventionalCommit {
    /// Case-insensitive check of the commit type.
    pub fn is_type(&self, commit_type: &str) -> bool {
        self.is_valid && self.commit_type.eq_ignore_ascii_case(commit_type)
    }
}

/// Classify a raw commit. Malformed messages are marked invalid rather than rejected.
pub fn classify(commit: &RawCommit) -> ConventionalCommit {
    let first_line = commit.message.lines().next().unwrap_or("").trim();

    // Check for BREAKING CHANGE in footer
    let breaking_in_footer =
        commit.message.contains("BREAKING CHANGE:") || commit.message.contains("BREAKING-CHANGE:");

    if let Some(caps) = HEADER_RE.captures(first_line) {
        let commit_type = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let scope = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let breaking_mark = caps.get(3).is_some();
        let description = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");

        return ConventionalCommit {
            hash: commit.sha.clone(),
            commit_type: commit_type.to_string(),
            scope,
            description: description.to_string(),
            breaking: breaking_mark || breaking_in_footer,
            is_valid: true,
        };
    }

    ConventionalCommit {
        hash: commit.sha.clone(),
        commit_type: String::new(),
        scope: None,
        description: first_line.to_string(),
        breaking: false,
        is_valid: false,
    }
}

/// Classify every commit, keeping only valid conventional commits.
pub fn classify_all(commits: &[RawCommit]) -> Vec<ConventionalCommit> {
    commits
        .iter()
        .map(classify)
        .filter(|commit| commit.is_valid)
        .collect()
}
