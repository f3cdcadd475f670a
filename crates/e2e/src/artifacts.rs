//! Failure screenshot storage

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::HarnessResult;

/// Longest scenario-name prefix kept in a file name, in characters
const MAX_NAME_CHARS: usize = 50;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet
    pub fn ensure_dir(&self) -> HarnessResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// `{name}_{timestamp}.png` with whitespace collapsed to `_` and the
    /// timestamp free of `:` and `.`
    pub fn file_name(scenario: &str, at: DateTime<Utc>) -> String {
        let name = WHITESPACE.replace_all(scenario, "_");
        let name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .take(MAX_NAME_CHARS)
            .collect();
        let timestamp = at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("{}_{}.png", name, timestamp)
    }

    /// Write a screenshot for `scenario`, returning its path
    pub fn persist(&self, scenario: &str, at: DateTime<Utc>, png: &[u8]) -> HarnessResult<PathBuf> {
        self.ensure_dir()?;
        let path = self.dir.join(Self::file_name(scenario, at));
        std::fs::write(&path, png)?;
        info!("Saved failure screenshot: {}", path.display());
        Ok(path)
    }
}
