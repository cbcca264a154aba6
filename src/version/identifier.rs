//! Dotted `key.N` identifiers used in pre-release, build and modifier text.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z-]+\.)(\d+)$").expect("identifier regex is valid"));

/// An alphabetic label with its separator and a numeric counter, e.g. `rc.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Label including the trailing separator (`"rc."`).
    pub key: String,
    pub value: u64,
}

impl Identifier {
    pub fn new(label: &str, value: u64) -> Self {
        Self {
            key: format!("{}.", label),
            value,
        }
    }

    /// Parse `label.N`. Text without a numeric suffix yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = IDENTIFIER_RE.captures(text)?;
        let value = caps.get(2)?.as_str().parse().ok()?;
        Some(Self {
            key: caps.get(1)?.as_str().to_string(),
            value,
        })
    }

    /// Same key with the counter advanced by one; `None` when the counter is exhausted.
    pub fn next(&self) -> Option<Self> {
        Some(Self {
            key: self.key.clone(),
            value: self.value.checked_add(1)?,
        })
    }

    /// Label without the trailing separator.
    pub fn label(&self) -> &str {
        self.key.strip_suffix('.').unwrap_or(&self.key)
    }

    /// Precedence of two optional identifiers.
    ///
    /// A missing identifier ranks above a present one: a plain version supersedes any of
    /// its pre-releases. Identifiers with different keys have no defined order and
    /// compare equal.
    pub fn compare(a: Option<&Identifier>, b: Option<&Identifier>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) if a.key == b.key => a.value.cmp(&b.value),
            (Some(_), Some(_)) => Ordering::Equal,
        }
    }

    /// Compare two optional raw identifier texts.
    pub fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
        let a = a.and_then(Identifier::parse);
        let b = b.and_then(Identifier::parse);
        Identifier::compare(a.as_ref(), b.as_ref())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key, self.value)
    }
}
