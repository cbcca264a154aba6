//! GitHub authentication detection.
//!
//! Token resolution order:
//! 1. Explicit token (`--token` or `GITHUB_TOKEN`)
//! 2. gh CLI (`gh auth token`)
//! 3. GH_TOKEN env var

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

/// Get a GitHub token, preferring the one passed on the command line.
pub fn get_github_token(explicit: Option<&str>) -> Result<String, GitHubError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using token from gh CLI");
        return Ok(token);
    }

    if let Ok(token) = env::var("GH_TOKEN")
        && !token.is_empty()
    {
        debug!("Using token from GH_TOKEN");
        return Ok(token);
    }

    Err(GitHubError::AuthenticationFailed)
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    let status = Command::new("gh")
        .args(["auth", "status"])
        .output()
        .ok()?;

    if !status.status.success() {
        return None;
    }

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_token_wins() {
        assert_eq!(get_github_token(Some(" abc ")).unwrap(), "abc");
    }

    #[test]
    #[serial_test::serial]
    fn test_blank_explicit_token_falls_through() {
        temp_env::with_var("GH_TOKEN", Some("from-env"), || {
            // gh may or may not be installed here; either source is acceptable.
            let token = get_github_token(Some("")).unwrap();
            assert!(!token.is_empty());
        });
    }
}
