//! Release configuration: changelog categories and exclusions.
//!
//! Loaded from a YAML file in the repository, or taken from the versioning scheme's
//! default when the file does not exist.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::version::IncrementType;

/// Matches every value in an include list.
pub const WILDCARD: &str = "*";

/// Default location of the configuration file inside the repository.
pub const DEFAULT_CONFIG_PATH: &str = ".github/release.yml";

fn wildcard() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

/// Values removed from a category (or from every category at the top level).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Exclusions {
    #[serde(default)]
    pub increment_types: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// One changelog section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Category {
    pub title: String,
    #[serde(default = "wildcard")]
    pub increment_types: Vec<String>,
    #[serde(default = "wildcard")]
    pub types: Vec<String>,
    #[serde(default = "wildcard")]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub exclude: Exclusions,
}

impl Category {
    /// A category accepting every commit.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            increment_types: wildcard(),
            types: wildcard(),
            scopes: wildcard(),
            exclude: Exclusions::default(),
        }
    }

    pub fn with_increment_types(mut self, increments: &[IncrementType]) -> Self {
        self.increment_types = increments.iter().map(|i| i.as_str().to_string()).collect();
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn excluding_scopes(mut self, scopes: &[&str]) -> Self {
        self.exclude.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfiguration {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub exclude: Exclusions,
}

/// File layout: everything lives under a top-level `changelog` key.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    changelog: ReleaseConfiguration,
}

impl ReleaseConfiguration {
    /// Parse the YAML configuration file content.
    pub fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|source| ConfigError::InvalidYaml {
                path: path.to_string(),
                source,
            })?;
        let config = file.changelog;
        config.validate()?;
        Ok(config)
    }

    /// Reject increment type names that no scheme knows about.
    fn validate(&self) -> Result<(), ConfigError> {
        let lists = self
            .categories
            .iter()
            .flat_map(|c| {
                [&c.increment_types, &c.exclude.increment_types]
                    .into_iter()
                    .map(move |list| (c.title.as_str(), list))
            })
            .chain(std::iter::once(("<exclude>", &self.exclude.increment_types)));

        for (category, list) in lists {
            for value in list {
                if value != WILDCARD && value.parse::<IncrementType>().is_err() {
                    return Err(ConfigError::UnknownIncrementType {
                        category: category.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Case-insensitive membership, honouring the wildcard.
pub(crate) fn list_matches(list: &[String], value: Option<&str>) -> bool {
    list.iter().any(|entry| {
        entry == WILDCARD || value.is_some_and(|v| entry.eq_ignore_ascii_case(v))
    })
}

/// Case-insensitive membership without wildcard semantics.
pub(crate) fn list_contains(list: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| list.iter().any(|entry| entry.eq_ignore_ascii_case(v)))
}
