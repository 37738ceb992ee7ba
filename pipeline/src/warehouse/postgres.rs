use async_trait::async_trait;
use common::Result;
use common::config::WarehouseConfig;
use sqlx::postgres::{PgPool, PgPoolCopyExt, PgPoolOptions};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{LogRecord, NewLogEntry};
use crate::storage::ObjectStorage;
use crate::warehouse::Warehouse;

/// Postgres-backed warehouse. The bulk load fetches the staged CSV from the
/// object store and streams it through `COPY ... FROM STDIN`, which skips
/// the header row and appends without touching existing table contents.
pub struct PostgresWarehouse {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
    students_table: String,
    file_log_table: String,
}

impl PostgresWarehouse {
    pub async fn connect(
        config: &WarehouseConfig,
        storage: Arc<dyn ObjectStorage>,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            storage,
            students_table: config.students_table.clone(),
            file_log_table: config.file_log_table.clone(),
        })
    }
}

#[async_trait]
impl Warehouse for PostgresWarehouse {
    async fn latest_log_entry(&self, file_path: &str) -> Result<Option<LogRecord>> {
        let query = format!(
            "SELECT file_path, last_modified_timestamp, load_status \
             FROM {} \
             WHERE file_path = $1 \
             ORDER BY created_at DESC \
             LIMIT 1",
            self.file_log_table
        );

        let record = sqlx::query_as::<_, LogRecord>(&query)
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn insert_log(&self, entry: NewLogEntry) -> Result<String> {
        let log_id = Uuid::new_v4().to_string();

        let query = format!(
            "INSERT INTO {} \
             (log_id, file_name, file_path, last_modified_timestamp, file_size_bytes, \
              rows_processed, load_status, staging_file_path, archive_file_path, \
              error_message, processed_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            self.file_log_table
        );

        sqlx::query(&query)
            .bind(&log_id)
            .bind(&entry.file_name)
            .bind(&entry.file_path)
            .bind(entry.last_modified_timestamp)
            .bind(entry.file_size_bytes)
            .bind(entry.rows_processed)
            .bind(entry.load_status.as_str())
            .bind(&entry.staging_file_path)
            .bind(&entry.archive_file_path)
            .bind(&entry.error_message)
            .bind(&entry.processed_by)
            .execute(&self.pool)
            .await
            .map_err(|e| common::Error::LogWrite(e.to_string()))?;

        info!(%log_id, status = %entry.load_status, path = %entry.file_path, "Inserted load-log entry");
        Ok(log_id)
    }

    async fn bulk_load(&self, bucket: &str, key: &str) -> Result<i64> {
        let data = self.storage.read(bucket, key).await?;

        let statement = format!(
            "COPY {} (student_id, student_name, address, phone, admission_date) \
             FROM STDIN WITH (FORMAT csv, HEADER true, NULL '')",
            self.students_table
        );

        let mut copy_in = self.pool.copy_in_raw(&statement).await?;
        copy_in.send(data.as_slice()).await?;
        let rows_loaded = copy_in.finish().await?;

        info!(rows_loaded, source = %format!("s3://{}/{}", bucket, key), "Bulk load complete");
        Ok(rows_loaded as i64)
    }
}
