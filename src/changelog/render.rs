//! Render release notes from classified commits.

use crate::config::{Category, Exclusions, ReleaseConfiguration, list_contains, list_matches};
use crate::git::ConventionalCommit;
use crate::scheme::VersionScheme;

/// Header of every rendered changelog.
pub const CHANGELOG_HEADER: &str = "## What's Changed";

/// Commits that landed in one configured category.
#[derive(Debug, Clone)]
pub struct ChangelogSection<'a> {
    pub title: &'a str,
    pub commits: Vec<&'a ConventionalCommit>,
}

/// Assign commits to the configured categories, in configuration order.
///
/// Empty categories are dropped. A commit may appear in several categories when
/// their filters overlap.
pub fn group_commits<'a>(
    scheme: &VersionScheme,
    config: &'a ReleaseConfiguration,
    commits: &'a [ConventionalCommit],
) -> Vec<ChangelogSection<'a>> {
    config
        .categories
        .iter()
        .map(|category| ChangelogSection {
            title: category.title.as_str(),
            commits: commits
                .iter()
                .filter(|commit| commit.is_valid)
                .filter(|commit| accepts(scheme, category, &config.exclude, commit))
                .collect(),
        })
        .filter(|section| !section.commits.is_empty())
        .collect()
}

/// Render the Markdown release body.
pub fn generate_changelog(
    scheme: &VersionScheme,
    config: &ReleaseConfiguration,
    commits: &[ConventionalCommit],
) -> String {
    let blocks: Vec<String> = group_commits(scheme, config, commits)
        .iter()
        .map(format_section)
        .collect();

    if blocks.is_empty() {
        return CHANGELOG_HEADER.to_string();
    }

    format!("{}\n\n{}", CHANGELOG_HEADER, blocks.join("\n\n"))
}

/// Generate a summary message for logs.
pub fn generate_summary(sections: &[ChangelogSection<'_>]) -> String {
    if sections.is_empty() {
        return "No changelog entries generated.".to_string();
    }

    let total: usize = sections.iter().map(|s| s.commits.len()).sum();
    let details: Vec<String> = sections
        .iter()
        .map(|s| format!("{}: {}", s.title, s.commits.len()))
        .collect();
    let entry_word = if total == 1 { "entry" } else { "entries" };

    format!("{} {} ({})", total, entry_word, details.join(", "))
}

fn format_section(section: &ChangelogSection<'_>) -> String {
    let mut block = format!("### {}", section.title);
    for commit in &section.commits {
        block.push_str(&format!("\n- {}", capitalize(&commit.description)));
    }
    block
}

fn accepts(
    scheme: &VersionScheme,
    category: &Category,
    top_level: &Exclusions,
    commit: &ConventionalCommit,
) -> bool {
    let increment = scheme.determine_increment_type(std::slice::from_ref(commit));

    allowed(
        &category.increment_types,
        &category.exclude.increment_types,
        &top_level.increment_types,
        increment.map(|i| i.as_str()),
    ) && allowed(
        &category.types,
        &category.exclude.types,
        &top_level.types,
        Some(commit.commit_type.as_str()),
    ) && allowed(
        &category.scopes,
        &category.exclude.scopes,
        &top_level.scopes,
        commit.scope.as_deref(),
    )
}

fn allowed(include: &[String], exclude: &[String], top_exclude: &[String], value: Option<&str>) -> bool {
    list_matches(include, value) && !list_contains(exclude, value) && !list_contains(top_exclude, value)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
