use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Metadata of a source object at the time the pipeline looked at it.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub name: String,
    pub full_path: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

/// Outcome status of one pipeline invocation, as recorded in the load log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Success,
    Skipped,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Success => "SUCCESS",
            LoadStatus::Skipped => "SKIPPED",
            LoadStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the change decision chose to process or skip a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    FirstLoad,
    FileModified,
    NotModified,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::FirstLoad => "FIRST_LOAD",
            DecisionReason::FileModified => "FILE_MODIFIED",
            DecisionReason::NotModified => "NOT_MODIFIED",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub process: bool,
    pub reason: DecisionReason,
}

/// The latest load-log row for a file path, as returned by the lookup query.
#[derive(Debug, Clone, FromRow)]
pub struct LogRecord {
    pub file_path: String,
    pub last_modified_timestamp: DateTime<Utc>,
    pub load_status: String,
}

/// One append-only audit row describing a processing attempt.
/// `log_id` and `created_at` are assigned at insert time.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub file_name: String,
    pub file_path: String,
    pub last_modified_timestamp: DateTime<Utc>,
    pub file_size_bytes: i64,
    pub rows_processed: i64,
    pub load_status: LoadStatus,
    pub staging_file_path: Option<String>,
    pub archive_file_path: Option<String>,
    pub error_message: Option<String>,
    pub processed_by: String,
}

/// A cleaned student row, immutable once built. The id passes through
/// untouched; the warehouse schema enforces its integer type on load.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub student_id: String,
    pub student_name: String,
    pub address: String,
    pub phone: String,
    pub admission_date: Option<NaiveDate>,
}

/// Final result of one invocation, returned to the trigger adapters.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub status: LoadStatus,
    pub file_name: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl PipelineOutcome {
    pub fn skipped(file_name: &str, reason: DecisionReason) -> Self {
        Self {
            status: LoadStatus::Skipped,
            file_name: file_name.to_string(),
            message: "File not modified since last processing".to_string(),
            details: serde_json::json!({ "reason": reason.as_str() }),
        }
    }

    pub fn success(
        file_name: &str,
        rows_processed: i64,
        archive_path: &str,
        log_id: &str,
    ) -> Self {
        Self {
            status: LoadStatus::Success,
            file_name: file_name.to_string(),
            message: format!("Successfully processed {}", file_name),
            details: serde_json::json!({
                "rows_processed": rows_processed,
                "archive_path": archive_path,
                "log_id": log_id,
            }),
        }
    }
}
