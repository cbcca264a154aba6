//! Semantic versions: `<prefix>MAJOR.MINOR.PATCH(-pre)(+build)`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::VersionError;

use super::identifier::Identifier;
use super::increment::IncrementType;
use super::split_prefix;

static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .expect("semver regex is valid")
});

/// Label used when a pre-release is started without one.
pub const DEFAULT_PRERELEASE_LABEL: &str = "rc";
/// Label used when build metadata is started without one.
pub const DEFAULT_BUILD_LABEL: &str = "build";

/// A semantic version with optional pre-release, build metadata and tag prefix.
///
/// Pre-release and build text are kept verbatim so that values without a numeric
/// counter (`+random`) survive a parse/format round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build: Option<String>,
    pub prefix: Option<String>,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// Parse version text, requiring `prefix` when one is given.
    ///
    /// Without an expected prefix, leading non-digit text is kept as the prefix.
    pub fn parse(text: &str, prefix: Option<&str>) -> Result<Self, VersionError> {
        let (prefix, core) = split_prefix(text, prefix)?;

        let caps = SEMVER_RE
            .captures(core)
            .ok_or_else(|| VersionError::parse(text, "expected MAJOR.MINOR.PATCH(-pre)(+build)"))?;

        let number = |index: usize| -> Result<u64, VersionError> {
            caps.get(index)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .parse()
                .map_err(|e| VersionError::parse(text, format!("{}", e)))
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
            prefix,
        })
    }

    /// True when `text` parses and carries exactly the expected prefix.
    pub fn is_valid(text: &str, prefix: Option<&str>) -> bool {
        let expected = prefix.filter(|p| !p.is_empty());
        match Self::parse(text, expected) {
            Ok(version) => version.prefix.as_deref() == expected,
            Err(_) => false,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre_release.is_some()
    }

    pub fn pre_release_identifier(&self) -> Option<Identifier> {
        self.pre_release.as_deref().and_then(Identifier::parse)
    }

    /// Apply a single increment.
    ///
    /// With `keep_metadata`, pre-release and build text carry over into the new version
    /// instead of being cleared.
    pub fn increment(&self, kind: IncrementType, keep_metadata: bool) -> Result<Self, VersionError> {
        let mut next = self.clone();
        if !keep_metadata {
            next.build = None;
        }

        match kind {
            IncrementType::Major => {
                next.major = self.bump_field(self.major, "major")?;
                next.minor = 0;
                next.patch = 0;
                next.clear_pre_release(keep_metadata);
            }
            IncrementType::Minor => {
                next.minor = self.bump_field(self.minor, "minor")?;
                next.patch = 0;
                next.clear_pre_release(keep_metadata);
            }
            IncrementType::Patch => {
                next.patch = self.bump_field(self.patch, "patch")?;
                next.clear_pre_release(keep_metadata);
            }
            IncrementType::PreRelease => {
                next.pre_release = Some(self.bump_identifier(
                    self.pre_release.as_deref(),
                    DEFAULT_PRERELEASE_LABEL,
                    "pre-release",
                )?);
            }
            IncrementType::Build => {
                next.build = Some(self.bump_identifier(
                    self.build.as_deref(),
                    DEFAULT_BUILD_LABEL,
                    "build",
                )?);
            }
            IncrementType::Release => return Ok(self.release()),
            IncrementType::Calendar | IncrementType::Micro | IncrementType::Modifier => {
                return Err(VersionError::IncrementNotApplicable {
                    increment: kind,
                    version_type: "semantic",
                });
            }
        }

        Ok(next)
    }

    /// The plain release this version belongs to (pre-release and build removed).
    pub fn release(&self) -> Self {
        Self {
            pre_release: None,
            build: None,
            ..self.clone()
        }
    }

    /// Replace the pre-release with `<label>.1` unless it already uses `label`.
    pub fn with_prerelease_label(&self, label: &str) -> Self {
        let current = self.pre_release_identifier();
        if current.as_ref().is_some_and(|id| id.label() == label) {
            return self.clone();
        }
        Self {
            pre_release: Some(Identifier::new(label, 1).to_string()),
            ..self.clone()
        }
    }

    /// Precedence: core numbers, then pre-release, then build metadata.
    pub fn compare(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| {
                Identifier::compare_text(self.pre_release.as_deref(), other.pre_release.as_deref())
            })
            .then_with(|| Identifier::compare_text(self.build.as_deref(), other.build.as_deref()))
    }

    fn clear_pre_release(&mut self, keep: bool) {
        if !keep {
            self.pre_release = None;
        }
    }

    fn overflow(&self, field: &'static str) -> VersionError {
        VersionError::Overflow {
            version: self.to_string(),
            field,
        }
    }

    fn bump_field(&self, value: u64, field: &'static str) -> Result<u64, VersionError> {
        value.checked_add(1).ok_or_else(|| self.overflow(field))
    }

    /// Advance `label.N` text, starting at `<default_label>.1` when absent or unparsable.
    fn bump_identifier(
        &self,
        current: Option<&str>,
        default_label: &str,
        field: &'static str,
    ) -> Result<String, VersionError> {
        match current.and_then(Identifier::parse) {
            Some(id) => id
                .next()
                .map(|next| next.to_string())
                .ok_or_else(|| self.overflow(field)),
            None => Ok(Identifier::new(default_label, 1).to_string()),
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
