use common::Result;
use common::config::Settings;
use std::sync::Arc;
use tracing::info;

use crate::models::PipelineOutcome;
use crate::processor::{FileProcessor, tabular};
use crate::storage::{ObjectStorage, S3Config, S3Storage};
use crate::warehouse::{PostgresWarehouse, Warehouse};

/// Wires the S3 storage and Postgres warehouse into a [`FileProcessor`] and
/// exposes the two trigger entry points to the API layer.
pub struct PipelineService {
    processor: FileProcessor,
    raw_bucket: String,
    incoming_prefix: String,
}

/// What the event adapter did with a storage notification.
#[derive(Debug)]
pub enum EventDisposition {
    Ignored(&'static str),
    Processed(PipelineOutcome),
}

impl PipelineService {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let s3_config = S3Config::from_settings(&settings.storage);
        let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(&s3_config));

        let warehouse: Arc<dyn Warehouse> = Arc::new(
            PostgresWarehouse::connect(&settings.warehouse, Arc::clone(&storage)).await?,
        );

        Ok(Self::from_parts(storage, warehouse, settings))
    }

    /// Builds the service over explicit backends; `new` wires the real S3
    /// and Postgres implementations through here.
    pub fn from_parts(
        storage: Arc<dyn ObjectStorage>,
        warehouse: Arc<dyn Warehouse>,
        settings: &Settings,
    ) -> Self {
        let processor = FileProcessor::new(storage, warehouse, settings);
        Self {
            processor,
            raw_bucket: settings.storage.raw_bucket.clone(),
            incoming_prefix: settings.pipeline.incoming_prefix.clone(),
        }
    }

    /// Synchronous invocation (HTTP trigger). The bucket defaults to the
    /// configured raw bucket when the request does not name one.
    pub async fn process_file(
        &self,
        file_name: &str,
        bucket: Option<&str>,
    ) -> Result<PipelineOutcome> {
        let bucket = bucket.unwrap_or(&self.raw_bucket);
        self.processor.process_file(bucket, file_name).await
    }

    /// Object-created notification (event trigger). Objects outside the
    /// incoming prefix or without a supported extension are ignored.
    pub async fn handle_event(&self, bucket: &str, name: &str) -> Result<EventDisposition> {
        if let Some(reason) = ignore_reason(&self.incoming_prefix, name) {
            info!(bucket, name, reason, "Ignoring storage event");
            return Ok(EventDisposition::Ignored(reason));
        }

        let outcome = self.processor.process_file(bucket, name).await?;
        Ok(EventDisposition::Processed(outcome))
    }
}

/// Event filter shared with tests: `None` means the object should be
/// forwarded to the pipeline.
pub fn ignore_reason(incoming_prefix: &str, object_name: &str) -> Option<&'static str> {
    if !object_name.starts_with(incoming_prefix) {
        return Some("not in incoming folder");
    }
    if !tabular::is_supported(object_name) {
        return Some("unsupported file type");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_supported_incoming_objects() {
        assert_eq!(ignore_reason("incoming/", "incoming/students.csv"), None);
        assert_eq!(ignore_reason("incoming/", "incoming/batch.XLSX"), None);
    }

    #[test]
    fn ignores_objects_outside_prefix() {
        assert!(ignore_reason("incoming/", "archived/students.csv").is_some());
        assert!(ignore_reason("incoming/", "students.csv").is_some());
    }

    #[test]
    fn ignores_unsupported_extensions() {
        assert!(ignore_reason("incoming/", "incoming/notes.txt").is_some());
        assert!(ignore_reason("incoming/", "incoming/data.json").is_some());
    }
}
