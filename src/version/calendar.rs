//! Calendar versions: `<prefix>YYYY.0M.MICRO(-modifier)*`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;

use crate::error::VersionError;

use super::identifier::Identifier;
use super::increment::IncrementType;
use super::split_prefix;

static CALVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\.(\d{2})\.(0|[1-9]\d*)((?:-[0-9A-Za-z.]+)*)$")
        .expect("calver regex is valid")
});

/// Label of the modifier added by a `Modifier` increment.
pub const HOTFIX_LABEL: &str = "hotfix";

/// A calendar version with ordered modifiers such as `hotfix.1` or `dev.2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarVersion {
    pub year: u32,
    pub month: u32,
    pub micro: u64,
    pub modifiers: Vec<String>,
    pub prefix: Option<String>,
}

impl CalendarVersion {
    pub fn new(year: u32, month: u32, micro: u64) -> Self {
        Self {
            year,
            month,
            micro,
            modifiers: Vec::new(),
            prefix: None,
        }
    }

    /// Version `YYYY.0M.0` for the month containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(date.year().unsigned_abs(), date.month(), 0)
    }

    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// Parse version text, requiring `prefix` when one is given.
    pub fn parse(text: &str, prefix: Option<&str>) -> Result<Self, VersionError> {
        let (prefix, core) = split_prefix(text, prefix)?;

        let caps = CALVER_RE
            .captures(core)
            .ok_or_else(|| VersionError::parse(text, "expected YYYY.0M.MICRO(-modifier)"))?;

        let field = |index: usize| caps.get(index).map(|m| m.as_str()).unwrap_or_default();

        let year = field(1)
            .parse()
            .map_err(|e| VersionError::parse(text, format!("invalid year: {}", e)))?;
        let month: u32 = field(2)
            .parse()
            .map_err(|e| VersionError::parse(text, format!("invalid month: {}", e)))?;
        if !(1..=12).contains(&month) {
            return Err(VersionError::parse(text, format!("month {} is out of range", month)));
        }
        let micro = field(3)
            .parse()
            .map_err(|e| VersionError::parse(text, format!("invalid micro: {}", e)))?;

        let modifiers = field(4)
            .split('-')
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            year,
            month,
            micro,
            modifiers,
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
        !self.modifiers.is_empty()
    }

    /// Whether `date` falls in a later month than this version.
    pub fn is_before_month_of(&self, date: NaiveDate) -> bool {
        (self.year, self.month) < (date.year().unsigned_abs(), date.month())
    }

    /// Apply a single increment. `today` drives `Calendar` increments.
    ///
    /// With `keep_modifiers`, existing modifiers carry over into the new version.
    pub fn increment(
        &self,
        kind: IncrementType,
        keep_modifiers: bool,
        today: NaiveDate,
    ) -> Result<Self, VersionError> {
        let mut next = self.clone();

        match kind {
            IncrementType::Calendar => {
                next.year = today.year().unsigned_abs();
                next.month = today.month();
                next.micro = 0;
                next.clear_modifiers(keep_modifiers);
            }
            IncrementType::Micro => {
                next.micro = self
                    .micro
                    .checked_add(1)
                    .ok_or_else(|| self.overflow("micro"))?;
                next.clear_modifiers(keep_modifiers);
            }
            IncrementType::Modifier => {
                let bumped = match next.modifiers.last().and_then(|m| Identifier::parse(m)) {
                    Some(id) => id.next().ok_or_else(|| self.overflow("modifier"))?,
                    None => Identifier::new(HOTFIX_LABEL, 1),
                };
                match next.modifiers.last_mut() {
                    Some(last) => *last = bumped.to_string(),
                    None => next.modifiers.push(bumped.to_string()),
                }
            }
            IncrementType::Release => return Ok(self.release()),
            IncrementType::Major
            | IncrementType::Minor
            | IncrementType::Patch
            | IncrementType::PreRelease
            | IncrementType::Build => {
                return Err(VersionError::IncrementNotApplicable {
                    increment: kind,
                    version_type: "calendar",
                });
            }
        }

        Ok(next)
    }

    /// The plain release this version belongs to (all modifiers removed).
    pub fn release(&self) -> Self {
        Self {
            modifiers: Vec::new(),
            ..self.clone()
        }
    }

    /// Replace the modifiers with `<label>.1` unless a `label` modifier already exists.
    pub fn with_prerelease_label(&self, label: &str) -> Self {
        let mut modifiers: Vec<String> = self
            .modifiers
            .iter()
            .filter(|m| Identifier::parse(m).is_some_and(|id| id.label() == label))
            .cloned()
            .collect();
        if modifiers.is_empty() {
            modifiers.push(Identifier::new(label, 1).to_string());
        }

        Self {
            modifiers,
            ..self.clone()
        }
    }

    /// Precedence: year, month, micro, then modifiers position by position.
    ///
    /// Modifiers with different labels at the same position compare equal, so versions
    /// mixing `hotfix` and pre-release labels have no reliable order.
    pub fn compare(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.micro)
            .cmp(&(other.year, other.month, other.micro))
            .then_with(|| {
                let len = self.modifiers.len().max(other.modifiers.len());
                (0..len)
                    .map(|i| {
                        Identifier::compare_text(
                            self.modifiers.get(i).map(String::as_str),
                            other.modifiers.get(i).map(String::as_str),
                        )
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    fn clear_modifiers(&mut self, keep: bool) {
        if !keep {
            self.modifiers.clear();
        }
    }

    fn overflow(&self, field: &'static str) -> VersionError {
        VersionError::Overflow {
            version: self.to_string(),
            field,
        }
    }
}

impl fmt::Display for CalendarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
        }
        write!(f, "{:04}.{:02}.{}", self.year, self.month, self.micro)?;
        for modifier in &self.modifiers {
            write!(f, "-{}", modifier)?;
        }
        Ok(())
    }
}
