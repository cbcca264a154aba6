//! Increment types and the engine that applies them in sequence.

use std::cmp::Ordering;
use std::fmt;

use crate::error::VersionError;
use crate::git::Branch;

use super::Version;
use super::clock::Clock;

/// Kind of version increment.
///
/// SemVer uses `Major`, `Minor`, `Patch`, `PreRelease` and `Build`; CalVer uses
/// `Calendar`, `Micro` and `Modifier`. `Release` belongs to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementType {
    Major,
    Minor,
    Patch,
    PreRelease,
    Build,
    Calendar,
    Micro,
    Modifier,
    Release,
}

impl IncrementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::PreRelease => "prerelease",
            Self::Build => "build",
            Self::Calendar => "calendar",
            Self::Micro => "micro",
            Self::Modifier => "modifier",
            Self::Release => "release",
        }
    }

    /// Increments that move the version core rather than its labels.
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::Major | Self::Minor | Self::Patch | Self::Calendar | Self::Micro
        )
    }
}

impl fmt::Display for IncrementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncrementType {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "prerelease" | "pre-release" => Ok(Self::PreRelease),
            "build" => Ok(Self::Build),
            "calendar" => Ok(Self::Calendar),
            "micro" => Ok(Self::Micro),
            "modifier" => Ok(Self::Modifier),
            "release" => Ok(Self::Release),
            _ => Err(VersionError::UnsupportedIncrementType(s.to_string())),
        }
    }
}

/// Run-wide settings that shape how increments are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementOptions {
    /// Keep releases in pre-release mode (`-dev.N` / `-rc.N`).
    pub prerelease: bool,
    pub branch: Branch,
}

/// Apply `increments` to `version` in order.
///
/// Every step after the first carries the pre-release/modifier state produced by the
/// previous step, so `[PreRelease, Minor]` yields `1.3.0-rc.1` from `1.2.3` and
/// `1.3.0-rc.2` from `1.3.0-rc.1`. Remaining steps are skipped as soon as the running
/// result ranks above the original version.
pub fn increment_version(
    version: &Version,
    increments: &[IncrementType],
    options: &IncrementOptions,
    clock: &dyn Clock,
) -> Result<Version, VersionError> {
    let mut current = version.clone();

    for (step, &kind) in increments.iter().enumerate() {
        current = apply_increment(&current, kind, step > 0, options, clock)?;

        if current.compare(version)? == Ordering::Greater {
            break;
        }
    }

    Ok(current)
}

fn apply_increment(
    version: &Version,
    kind: IncrementType,
    keep: bool,
    options: &IncrementOptions,
    clock: &dyn Clock,
) -> Result<Version, VersionError> {
    if kind == IncrementType::Release {
        // Pre-release mode never promotes.
        return Ok(if options.prerelease {
            version.clone()
        } else {
            version.release()
        });
    }

    let bumped = match version {
        Version::Semantic(v) => Version::Semantic(v.increment(kind, keep)?),
        Version::Calendar(v) => {
            let today = clock.today();
            let kind = if kind == IncrementType::Calendar && !v.is_before_month_of(today) {
                IncrementType::Micro
            } else {
                kind
            };
            Version::Calendar(v.increment(kind, keep, today)?)
        }
    };

    if options.prerelease && kind.is_core() {
        Ok(bumped.with_prerelease_label(options.branch.prerelease_label()))
    } else {
        Ok(bumped)
    }
}
