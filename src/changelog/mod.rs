//! Release notes rendering.

pub mod render;

pub use render::{ChangelogSection, generate_changelog, generate_summary, group_commits};
