//! Step outputs: `previous-version`, `incremented-version` and `release`.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use super::ReleaseOutcome;
use crate::error::ReleaseError;

/// Environment variable naming the workflow output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const DELIMITER: &str = "CUTRELEASE_EOF";

/// Values published at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    pub previous_version: String,
    pub incremented_version: String,
    /// JSON of the created release, empty when none was created.
    pub release: String,
}

impl ActionOutputs {
    pub fn from_outcome(outcome: &ReleaseOutcome) -> Result<Self, ReleaseError> {
        let release = match outcome {
            ReleaseOutcome::Created { release, .. } => serde_json::to_string(release)
                .map_err(|e| ReleaseError::OutputFailed(io::Error::other(e)))?,
            _ => String::new(),
        };

        Ok(Self {
            previous_version: outcome
                .previous()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            incremented_version: outcome
                .incremented()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            release,
        })
    }

    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("previous-version", self.previous_version.as_str()),
            ("incremented-version", self.incremented_version.as_str()),
            ("release", self.release.as_str()),
        ]
    }

    /// Render in the workflow-command file format.
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|(name, value)| format_entry(name, value))
            .collect()
    }
}

/// Append outputs to `$GITHUB_OUTPUT`, or print them when not running in a workflow.
pub fn write_outputs(outputs: &ActionOutputs) -> Result<(), ReleaseError> {
    match env::var_os(GITHUB_OUTPUT_ENV).filter(|p| !p.is_empty()) {
        Some(path) => {
            debug!("Writing outputs to {}", Path::new(&path).display());
            append_outputs(Path::new(&path), outputs).map_err(ReleaseError::OutputFailed)
        }
        None => {
            print!("{}", outputs.render());
            Ok(())
        }
    }
}

fn append_outputs(path: &Path, outputs: &ActionOutputs) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(outputs.render().as_bytes())
}

fn format_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    // The delimiter must not occur inside the value.
    let mut delimiter = DELIMITER.to_string();
    let mut attempt = 0;
    while value.contains(&delimiter) {
        attempt += 1;
        delimiter = format!("{}_{}", DELIMITER, attempt);
    }

    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}
