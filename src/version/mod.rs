//! Version values, comparison and the increment engine.

pub mod calendar;
pub mod clock;
pub mod identifier;
pub mod increment;
pub mod semantic;

use std::cmp::Ordering;
use std::fmt;

use crate::error::VersionError;

pub use calendar::CalendarVersion;
pub use clock::{Clock, FixedClock, SystemClock};
pub use identifier::Identifier;
pub use increment::{IncrementOptions, IncrementType, increment_version};
pub use semantic::SemanticVersion;

/// A version under either versioning scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Semantic(SemanticVersion),
    Calendar(CalendarVersion),
}

impl Version {
    pub fn parse_semantic(text: &str, prefix: Option<&str>) -> Result<Self, VersionError> {
        SemanticVersion::parse(text, prefix).map(Self::Semantic)
    }

    pub fn parse_calendar(text: &str, prefix: Option<&str>) -> Result<Self, VersionError> {
        CalendarVersion::parse(text, prefix).map(Self::Calendar)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Semantic(_) => "semantic",
            Self::Calendar(_) => "calendar",
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self {
            Self::Semantic(v) => v.prefix.as_deref(),
            Self::Calendar(v) => v.prefix.as_deref(),
        }
    }

    /// Whether the version carries a pre-release (SemVer) or modifier (CalVer).
    pub fn is_prerelease(&self) -> bool {
        match self {
            Self::Semantic(v) => v.is_prerelease(),
            Self::Calendar(v) => v.is_prerelease(),
        }
    }

    /// Version text without the tag prefix.
    pub fn unprefixed(&self) -> String {
        let text = self.to_string();
        match self.prefix() {
            Some(prefix) => text.strip_prefix(prefix).unwrap_or(&text).to_string(),
            None => text,
        }
    }

    pub fn release(&self) -> Self {
        match self {
            Self::Semantic(v) => Self::Semantic(v.release()),
            Self::Calendar(v) => Self::Calendar(v.release()),
        }
    }

    pub fn with_prerelease_label(&self, label: &str) -> Self {
        match self {
            Self::Semantic(v) => Self::Semantic(v.with_prerelease_label(label)),
            Self::Calendar(v) => Self::Calendar(v.with_prerelease_label(label)),
        }
    }

    pub fn compare(&self, other: &Self) -> Result<Ordering, VersionError> {
        compare_versions(self, other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semantic(v) => fmt::Display::fmt(v, f),
            Self::Calendar(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Compare two versions of the same scheme.
pub fn compare_versions(a: &Version, b: &Version) -> Result<Ordering, VersionError> {
    match (a, b) {
        (Version::Semantic(a), Version::Semantic(b)) => Ok(a.compare(b)),
        (Version::Calendar(a), Version::Calendar(b)) => Ok(a.compare(b)),
        _ => Err(VersionError::IncompatibleVersionTypes {
            left: a.type_name(),
            right: b.type_name(),
        }),
    }
}

/// Split `text` into its tag prefix and version core.
///
/// An expected prefix must be present. Without one, everything before the first digit
/// is taken as the prefix.
pub(crate) fn split_prefix<'a>(
    text: &'a str,
    expected: Option<&str>,
) -> Result<(Option<String>, &'a str), VersionError> {
    match expected.filter(|p| !p.is_empty()) {
        Some(prefix) => {
            let core = text
                .strip_prefix(prefix)
                .ok_or_else(|| VersionError::parse(text, format!("missing prefix '{}'", prefix)))?;
            Ok((Some(prefix.to_string()), core))
        }
        None => {
            let start = text
                .find(|c: char| c.is_ascii_digit())
                .ok_or_else(|| VersionError::parse(text, "no version number found"))?;
            let prefix = (start > 0).then(|| text[..start].to_string());
            Ok((prefix, &text[start..]))
        }
    }
}
