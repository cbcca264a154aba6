//! Versioning schemes: SemVer and CalVer policies over the version types.

use crate::config::{Category, ReleaseConfiguration};
use crate::error::VersionError;
use crate::git::{Branch, ConventionalCommit};
use crate::version::{CalendarVersion, Clock, IncrementType, SemanticVersion, Version};

/// Increment types each scheme accepts besides `Release`.
const SEMVER_INCREMENTS: [IncrementType; 5] = [
    IncrementType::Major,
    IncrementType::Minor,
    IncrementType::Patch,
    IncrementType::PreRelease,
    IncrementType::Build,
];
const CALVER_INCREMENTS: [IncrementType; 3] = [
    IncrementType::Calendar,
    IncrementType::Micro,
    IncrementType::Modifier,
];

/// Semantic versioning driven by `feat`, `fix` and breaking commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVerScheme {
    pub prefix: Option<String>,
    pub branch: Branch,
}

/// Calendar versioning on a monthly cadence, independent of commit content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalVerScheme {
    pub prefix: Option<String>,
}

/// The versioning policy selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionScheme {
    SemVer(SemVerScheme),
    CalVer(CalVerScheme),
}

impl VersionScheme {
    /// Select a scheme by name (`semver` or `calver`, case-insensitive).
    pub fn new(name: &str, prefix: Option<&str>, branch: Branch) -> Result<Self, VersionError> {
        let prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        match name.trim().to_lowercase().as_str() {
            "semver" => Ok(Self::SemVer(SemVerScheme { prefix, branch })),
            "calver" => Ok(Self::CalVer(CalVerScheme { prefix })),
            _ => Err(VersionError::UnsupportedScheme(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SemVer(_) => "semver",
            Self::CalVer(_) => "calver",
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self {
            Self::SemVer(s) => s.prefix.as_deref(),
            Self::CalVer(s) => s.prefix.as_deref(),
        }
    }

    /// Parse tag text as a version of this scheme, requiring the configured prefix.
    pub fn parse(&self, text: &str) -> Result<Version, VersionError> {
        match self {
            Self::SemVer(s) => Version::parse_semantic(text, s.prefix.as_deref()),
            Self::CalVer(s) => Version::parse_calendar(text, s.prefix.as_deref()),
        }
    }

    pub fn is_valid(&self, text: &str) -> bool {
        match self {
            Self::SemVer(s) => SemanticVersion::is_valid(text, s.prefix.as_deref()),
            Self::CalVer(s) => CalendarVersion::is_valid(text, s.prefix.as_deref()),
        }
    }

    /// Whether `increment` belongs to this scheme. `Release` always does.
    pub fn supports(&self, increment: IncrementType) -> bool {
        if increment == IncrementType::Release {
            return true;
        }
        match self {
            Self::SemVer(_) => SEMVER_INCREMENTS.contains(&increment),
            Self::CalVer(_) => CALVER_INCREMENTS.contains(&increment),
        }
    }

    /// The increment that starts or advances a pre-release.
    pub fn prerelease_increment(&self) -> IncrementType {
        match self {
            Self::SemVer(_) => IncrementType::PreRelease,
            Self::CalVer(_) => IncrementType::Modifier,
        }
    }

    /// Parse a pipe-delimited increment list such as `prerelease|minor`.
    pub fn parse_increment_types(&self, input: &str) -> Result<Vec<IncrementType>, VersionError> {
        input
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                let increment: IncrementType = token.parse()?;
                if self.supports(increment) {
                    Ok(increment)
                } else {
                    Err(VersionError::UnsupportedIncrementType(token.to_string()))
                }
            })
            .collect()
    }

    /// Decide the increment a set of commits calls for.
    ///
    /// `None` means nothing in the commits warrants a release.
    pub fn determine_increment_type(&self, commits: &[ConventionalCommit]) -> Option<IncrementType> {
        match self {
            Self::SemVer(s) => s.determine_increment_type(commits),
            Self::CalVer(_) => Some(IncrementType::Calendar),
        }
    }

    /// Baseline version used when the repository has no releases yet.
    pub fn initial_version(&self, clock: &dyn Clock) -> Version {
        match self {
            Self::SemVer(s) => {
                Version::Semantic(SemanticVersion::new(0, 0, 0).with_prefix(s.prefix.as_deref()))
            }
            Self::CalVer(s) => Version::Calendar(
                CalendarVersion::for_date(clock.today()).with_prefix(s.prefix.as_deref()),
            ),
        }
    }

    /// Changelog layout used when the repository has no configuration file.
    pub fn default_configuration(&self) -> ReleaseConfiguration {
        let categories = match self {
            Self::SemVer(_) => vec![
                Category::new("Breaking Changes").with_increment_types(&[IncrementType::Major]),
                Category::new("New Features").with_increment_types(&[IncrementType::Minor]),
                Category::new("Bug Fixes").with_increment_types(&[IncrementType::Patch]),
            ],
            Self::CalVer(_) => vec![Category::new("Changes")],
        };
        ReleaseConfiguration {
            categories,
            ..Default::default()
        }
    }
}

impl SemVerScheme {
    fn determine_increment_type(&self, commits: &[ConventionalCommit]) -> Option<IncrementType> {
        let valid = || commits.iter().filter(|c| c.is_valid);
        let on_release_branch = self.branch.is_release();

        if valid().any(|c| c.breaking) {
            return Some(if on_release_branch {
                IncrementType::Patch
            } else {
                IncrementType::Major
            });
        }

        let features = valid().filter(|c| c.is_type("feat")).count();
        let fixes = valid().filter(|c| c.is_type("fix")).count();

        match (features, fixes) {
            (0, 0) => None,
            _ if on_release_branch => Some(IncrementType::Patch),
            (0, _) => Some(IncrementType::Patch),
            _ => Some(IncrementType::Minor),
        }
    }
}
