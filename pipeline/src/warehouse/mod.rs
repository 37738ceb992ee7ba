pub mod postgres;

use async_trait::async_trait;
use common::Result;

use crate::models::{LogRecord, NewLogEntry};

pub use postgres::PostgresWarehouse;

/// Capability interface over the warehouse: the load-log lookup and sink,
/// plus the bulk load of a staged CSV into the students table.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Most recent log row for `file_path`, by creation time descending.
    async fn latest_log_entry(&self, file_path: &str) -> Result<Option<LogRecord>>;

    /// Appends one audit row with a freshly generated id; returns the id.
    async fn insert_log(&self, entry: NewLogEntry) -> Result<String>;

    /// Loads the staged CSV at `bucket`/`key` into the students table,
    /// appending rows and skipping the header. Blocks until the load
    /// finishes and returns the number of rows loaded.
    async fn bulk_load(&self, bucket: &str, key: &str) -> Result<i64>;
}
