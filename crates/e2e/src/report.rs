//! Scenario result records and the JSON suite report

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::HarnessResult;

pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
    Undefined,
}

impl ScenarioStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ScenarioStatus::Failed)
    }
}

/// Binary artifact attached to a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub mime_type: String,
    pub sha256: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            sha256: hex::encode(Sha256::digest(&data)),
            data,
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self::new(PNG_MIME, data)
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub feature: String,
    pub name: String,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ScenarioRecord {
    pub fn new(feature: impl Into<String>, name: impl Into<String>, status: ScenarioStatus) -> Self {
        Self {
            feature: feature.into(),
            name: name.into(),
            status,
            duration_ms: 0,
            attachments: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub undefined: usize,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioRecord>,
}

/// Collects scenario records as they finish; safe to share between hooks
#[derive(Debug)]
pub struct SuiteReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    started: Instant,
    records: Mutex<Vec<ScenarioRecord>>,
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            started: Instant::now(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, record: ScenarioRecord) {
        match record.status {
            ScenarioStatus::Failed => error!("✗ {} ({} ms)", record.name, record.duration_ms),
            status => info!("{:?}: {} ({} ms)", status, record.name, record.duration_ms),
        }
        self.records.lock().push(record);
    }

    pub fn has_failures(&self) -> bool {
        self.records.lock().iter().any(|r| r.status.is_failed())
    }

    pub fn summary(&self) -> SuiteSummary {
        let scenarios = self.records.lock().clone();
        let count = |status: ScenarioStatus| scenarios.iter().filter(|r| r.status == status).count();

        SuiteSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            total: scenarios.len(),
            passed: count(ScenarioStatus::Passed),
            failed: count(ScenarioStatus::Failed),
            skipped: count(ScenarioStatus::Skipped),
            undefined: count(ScenarioStatus::Undefined),
            duration_ms: self.started.elapsed().as_millis() as u64,
            scenarios,
        }
    }

    /// Write the summary as pretty JSON, creating parent directories
    pub fn write(&self, path: &Path) -> HarnessResult<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = self.summary();
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;

        info!(
            "Results: {} passed, {} failed, {} skipped, {} undefined ({} ms)",
            summary.passed, summary.failed, summary.skipped, summary.undefined, summary.duration_ms
        );
        info!("Results written to: {}", path.display());
        Ok(path.to_path_buf())
    }
}
