use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use std::sync::Arc;

use super::models::{EventResponse, ProcessRequest, StorageEvent};
use crate::services::AppError;
use crate::services::pipeline::{EventDisposition, PipelineService};

/// Manual invocation: runs the pipeline for the named file and returns the
/// outcome. 400 when `fileName` is missing, 500 with a FAILED body when the
/// run errors.
pub async fn process_file(
    State(service): State<Arc<PipelineService>>,
    Json(request): Json<ProcessRequest>,
) -> Response {
    let Some(file_name) = request.file_name.filter(|name| !name.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "ERROR",
                "message": "Please provide 'fileName' in request body",
            })),
        )
            .into_response();
    };

    match service
        .process_file(&file_name, request.bucket_name.as_deref())
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "FAILED",
                "file_name": file_name,
                "message": err.to_string(),
                "details": {},
            })),
        )
            .into_response(),
    }
}

/// Object-created notifications. Out-of-scope objects are acknowledged as
/// ignored; pipeline errors surface as 500 so the hosting platform records
/// the trigger failure.
pub async fn handle_event(
    State(service): State<Arc<PipelineService>>,
    Json(event): Json<StorageEvent>,
) -> Result<Json<EventResponse>, AppError> {
    match service.handle_event(&event.bucket, &event.name).await? {
        EventDisposition::Ignored(reason) => Ok(Json(EventResponse {
            ignored: true,
            reason: Some(reason.to_string()),
            outcome: None,
        })),
        EventDisposition::Processed(outcome) => Ok(Json(EventResponse {
            ignored: false,
            reason: None,
            outcome: Some(outcome),
        })),
    }
}

// Define all API routes
pub fn routes(service: Arc<PipelineService>) -> Router {
    Router::new()
        .route("/api/process", post(process_file))
        .route("/api/events", post(handle_event))
        .with_state(service)
}
