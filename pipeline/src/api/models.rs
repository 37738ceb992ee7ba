use serde::{Deserialize, Serialize};

use crate::models::PipelineOutcome;

// Request models
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "bucketName")]
    pub bucket_name: Option<String>,
}

/// Storage object-created notification payload.
#[derive(Debug, Deserialize)]
pub struct StorageEvent {
    pub bucket: String,
    pub name: String,
}

// Response models
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub ignored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PipelineOutcome>,
}
