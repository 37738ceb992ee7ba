pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::Result;

pub use s3::S3Storage;

/// Size and modification time of an object, as reported by the store.
#[derive(Debug, Clone, Copy)]
pub struct ObjectMeta {
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

/// Capability interface over the object store. The pipeline only ever
/// touches blobs through these five operations, which keeps it testable
/// against an in-memory store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectMeta>;
    async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    async fn write(&self, bucket: &str, key: &str, data: &[u8], content_type: &str)
        -> Result<()>;
    async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()>;
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl S3Config {
    pub fn from_settings(storage: &common::config::StorageConfig) -> Self {
        Self {
            endpoint: storage.endpoint.clone(),
            region: storage.region.clone(),
            access_key: storage.access_key.clone(),
            secret_key: storage.secret_key.clone(),
        }
    }
}
