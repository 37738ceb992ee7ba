pub mod cleaners;
pub mod decision;
pub mod tabular;
pub mod transform;

use chrono::Utc;
use common::Result;
use common::config::Settings;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{FileMetadata, LoadStatus, NewLogEntry, PipelineOutcome};
use crate::storage::ObjectStorage;
use crate::utils::paths;
use crate::warehouse::Warehouse;

/// Runs the transform-and-load sequence for one source file:
/// metadata → log lookup → change decision → read → clean → stage →
/// bulk load → archive → delete source → delete staging → log.
///
/// Each invocation is independent and strictly sequential. The only shared
/// resource is the append-only load log; racing events for the same path
/// may both pass the change decision (at-least-once semantics).
pub struct FileProcessor {
    storage: Arc<dyn ObjectStorage>,
    warehouse: Arc<dyn Warehouse>,
    staging_bucket: String,
    archive_bucket: String,
    processed_by: String,
}

impl FileProcessor {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        warehouse: Arc<dyn Warehouse>,
        settings: &Settings,
    ) -> Self {
        Self {
            storage,
            warehouse,
            staging_bucket: settings.storage.staging_bucket.clone(),
            archive_bucket: settings.storage.archive_bucket.clone(),
            processed_by: settings.pipeline.processed_by.clone(),
        }
    }

    /// Processes one file, recording a FAILED log row (best effort) before
    /// surfacing any error to the caller. A failed run leaves the source
    /// object in place so the next event retriggers it.
    pub async fn process_file(&self, bucket: &str, key: &str) -> Result<PipelineOutcome> {
        match self.run(bucket, key).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(bucket, key, error = %err, "Pipeline run failed");

                let failure_log = NewLogEntry {
                    file_name: paths::file_basename(key).to_string(),
                    file_path: paths::object_uri(bucket, key),
                    last_modified_timestamp: Utc::now(),
                    file_size_bytes: 0,
                    rows_processed: 0,
                    load_status: LoadStatus::Failed,
                    staging_file_path: None,
                    archive_file_path: None,
                    error_message: Some(err.to_string()),
                    processed_by: self.processed_by.clone(),
                };
                // Secondary failures here must never mask the original error.
                if let Err(log_err) = self.warehouse.insert_log(failure_log).await {
                    warn!(error = %log_err, "Could not record FAILED log entry");
                }

                Err(err)
            }
        }
    }

    async fn run(&self, bucket: &str, key: &str) -> Result<PipelineOutcome> {
        let file_name = paths::file_basename(key).to_string();
        let full_path = paths::object_uri(bucket, key);
        info!(%full_path, "Starting pipeline");

        let meta = self.storage.stat(bucket, key).await?;
        let metadata = FileMetadata {
            name: key.to_string(),
            full_path: full_path.clone(),
            size: meta.size,
            last_modified: meta.last_modified,
        };
        info!(stage = "metadata", size = metadata.size, last_modified = %metadata.last_modified, "Read source metadata");

        let prior = self.warehouse.latest_log_entry(&full_path).await?;
        info!(stage = "log_lookup", found = prior.is_some(), "Checked load log");

        let decision = decision::should_process(&metadata, prior.as_ref());
        info!(stage = "decision", process = decision.process, reason = %decision.reason, "Evaluated change decision");

        if !decision.process {
            self.warehouse
                .insert_log(NewLogEntry {
                    file_name: file_name.clone(),
                    file_path: full_path,
                    last_modified_timestamp: metadata.last_modified,
                    file_size_bytes: metadata.size,
                    rows_processed: 0,
                    load_status: LoadStatus::Skipped,
                    staging_file_path: None,
                    archive_file_path: None,
                    error_message: Some(format!("Skipped: {}", decision.reason)),
                    processed_by: self.processed_by.clone(),
                })
                .await?;
            return Ok(PipelineOutcome::skipped(&file_name, decision.reason));
        }

        let bytes = self.storage.read(bucket, key).await?;
        let table = tabular::read_table(key, &bytes)?;
        info!(stage = "read_source", rows = table.row_count(), "Loaded source table");

        let records = transform::clean_table(&table)?;
        info!(stage = "cleaned", rows = records.len(), "Applied field cleaners");

        let staging_key = paths::staging_key(key);
        let staged_csv = transform::to_csv(&records)?;
        self.storage
            .write(&self.staging_bucket, &staging_key, &staged_csv, "text/csv")
            .await?;
        let staging_uri = paths::object_uri(&self.staging_bucket, &staging_key);
        info!(stage = "staged", %staging_uri, "Wrote cleaned CSV to staging");

        let rows_loaded = self
            .warehouse
            .bulk_load(&self.staging_bucket, &staging_key)
            .await?;
        info!(stage = "loaded", rows_loaded, "Bulk load finished");

        let archive_key = paths::archive_key(key, Utc::now());
        self.storage
            .copy(bucket, key, &self.archive_bucket, &archive_key)
            .await?;
        let archive_uri = paths::object_uri(&self.archive_bucket, &archive_key);
        info!(stage = "archived", %archive_uri, "Archived original file");

        self.storage.delete(bucket, key).await?;
        info!(stage = "source_deleted", "Deleted source object");

        self.storage.delete(&self.staging_bucket, &staging_key).await?;
        info!(stage = "staging_deleted", "Deleted staging object");

        let log_id = self
            .warehouse
            .insert_log(NewLogEntry {
                file_name: file_name.clone(),
                file_path: full_path,
                last_modified_timestamp: metadata.last_modified,
                file_size_bytes: metadata.size,
                rows_processed: rows_loaded,
                load_status: LoadStatus::Success,
                staging_file_path: Some(staging_uri),
                archive_file_path: Some(archive_uri.clone()),
                error_message: None,
                processed_by: self.processed_by.clone(),
            })
            .await?;
        info!(stage = "logged", %log_id, "Pipeline completed");

        Ok(PipelineOutcome::success(
            &file_name,
            rows_loaded,
            &archive_uri,
            &log_id,
        ))
    }
}
