use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub storage: StorageConfig,
    pub warehouse: WarehouseConfig,
    #[serde(default = "default_pipeline_config")]
    pub pipeline: PipelineConfig,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub raw_bucket: String,     // incoming uploads land here
    pub staging_bucket: String, // cleaned CSVs between transform and load
    pub archive_bucket: String, // processed originals
}

#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseConfig {
    pub database_url: String,
    #[serde(default = "default_students_table")]
    pub students_table: String,
    #[serde(default = "default_file_log_table")]
    pub file_log_table: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_incoming_prefix")]
    pub incoming_prefix: String,
    #[serde(default = "default_processed_by")]
    pub processed_by: String,
}

fn default_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        incoming_prefix: default_incoming_prefix(),
        processed_by: default_processed_by(),
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_students_table() -> String {
    "students".to_string()
}

fn default_file_log_table() -> String {
    "file_load_log".to_string()
}

fn default_incoming_prefix() -> String {
    "incoming/".to_string()
}

fn default_processed_by() -> String {
    "PIPELINE_SERVICE".to_string()
}

fn default_api_port() -> u16 {
    3000
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        // Build the configuration
        let config = builder.build()?;

        // Try to deserialize the entire configuration
        let settings: Settings = config.try_deserialize()?;

        debug!(
            raw_bucket = %settings.storage.raw_bucket,
            staging_bucket = %settings.storage.staging_bucket,
            archive_bucket = %settings.storage.archive_bucket,
            "Loaded pipeline configuration"
        );

        Ok(settings)
    }
}
