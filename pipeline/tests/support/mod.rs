#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::config::{PipelineConfig, Settings, StorageConfig, WarehouseConfig};
use pipeline::models::{LogRecord, NewLogEntry};
use pipeline::storage::{ObjectMeta, ObjectStorage};
use pipeline::warehouse::Warehouse;

pub const RAW: &str = "raw-incoming";
pub const STAGING: &str = "staging-clean";
pub const ARCHIVE: &str = "archive";

pub const DIRTY_CSV: &str = "\
StudentID,StudentName,Address,Phone,Admission_date
1,O'Brien_Smith!!,\"12, Park #Road\",(987) 654-3210,2023/01/05
2,NULL,45 Oak Ave,9.87654321E9,2023-02-10
3,  Maria   Lopez ,NULL,123,not a date
";

pub struct StoredObject {
    pub data: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

/// In-memory object store standing in for S3.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryStorage {
    pub fn put(&self, bucket: &str, key: &str, data: &[u8], last_modified: DateTime<Utc>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: data.to_vec(),
                last_modified,
            },
        );
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn stat(&self, bucket: &str, key: &str) -> common::Result<ObjectMeta> {
        let objects = self.objects.lock().unwrap();
        let object = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| common::Error::NotFound(format!("s3://{}/{}", bucket, key)))?;
        Ok(ObjectMeta {
            size: object.data.len() as i64,
            last_modified: object.last_modified,
        })
    }

    async fn read(&self, bucket: &str, key: &str) -> common::Result<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        let object = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| common::Error::NotFound(format!("s3://{}/{}", bucket, key)))?;
        Ok(object.data.clone())
    }

    async fn write(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        _content_type: &str,
    ) -> common::Result<()> {
        self.put(bucket, key, data, Utc::now());
        Ok(())
    }

    async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> common::Result<()> {
        let mut objects = self.objects.lock().unwrap();
        let source = objects
            .get(&(src_bucket.to_string(), src_key.to_string()))
            .ok_or_else(|| common::Error::NotFound(format!("s3://{}/{}", src_bucket, src_key)))?;
        let copied = StoredObject {
            data: source.data.clone(),
            last_modified: Utc::now(),
        };
        objects.insert((dst_bucket.to_string(), dst_key.to_string()), copied);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> common::Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// In-memory warehouse: an append-only log plus a line-counting bulk load
/// that reads the staged CSV from the fake object store. Either operation
/// can be switched to fail for error-path coverage.
pub struct MemoryWarehouse {
    storage: Arc<MemoryStorage>,
    log: Mutex<Vec<NewLogEntry>>,
    loaded_files: Mutex<Vec<String>>,
    pub fail_bulk_load: AtomicBool,
    pub fail_insert_log: AtomicBool,
}

impl MemoryWarehouse {
    pub fn new(storage: Arc<MemoryStorage>) -> Self {
        Self {
            storage,
            log: Mutex::new(Vec::new()),
            loaded_files: Mutex::new(Vec::new()),
            fail_bulk_load: AtomicBool::new(false),
            fail_insert_log: AtomicBool::new(false),
        }
    }

    pub fn entries(&self) -> Vec<NewLogEntry> {
        self.log.lock().unwrap().clone()
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded_files.lock().unwrap().clone()
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn latest_log_entry(&self, file_path: &str) -> common::Result<Option<LogRecord>> {
        let log = self.log.lock().unwrap();
        Ok(log
            .iter()
            .rev()
            .find(|entry| entry.file_path == file_path)
            .map(|entry| LogRecord {
                file_path: entry.file_path.clone(),
                last_modified_timestamp: entry.last_modified_timestamp,
                load_status: entry.load_status.as_str().to_string(),
            }))
    }

    async fn insert_log(&self, entry: NewLogEntry) -> common::Result<String> {
        if self.fail_insert_log.load(Ordering::SeqCst) {
            return Err(common::Error::LogWrite(
                "simulated log insert failure".to_string(),
            ));
        }
        self.log.lock().unwrap().push(entry);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn bulk_load(&self, bucket: &str, key: &str) -> common::Result<i64> {
        if self.fail_bulk_load.load(Ordering::SeqCst) {
            return Err(common::Error::Other("simulated warehouse outage".to_string()));
        }
        let data = self.storage.read(bucket, key).await?;
        let text = String::from_utf8(data)?;
        self.loaded_files.lock().unwrap().push(text.clone());
        // Header row is skipped, as the real load does.
        Ok(text.lines().count() as i64 - 1)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        storage: StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            region: "us-east-1".to_string(),
            raw_bucket: RAW.to_string(),
            staging_bucket: STAGING.to_string(),
            archive_bucket: ARCHIVE.to_string(),
        },
        warehouse: WarehouseConfig {
            database_url: "postgres://unused".to_string(),
            students_table: "students".to_string(),
            file_log_table: "file_load_log".to_string(),
        },
        pipeline: PipelineConfig {
            incoming_prefix: "incoming/".to_string(),
            processed_by: "PIPELINE_SERVICE".to_string(),
        },
        api_port: 0,
    }
}
