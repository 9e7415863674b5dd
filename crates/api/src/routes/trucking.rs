//! Trucking record routes.
//!
//! Record mutations flow through the lifecycle coordinator so the blob
//! store and the record store stay consistent; these handlers only decode
//! the wire format and map errors.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors};
use haulbook_core::record::{
    RecordError, RecordRepository as RecordRepoTrait, RecordService, TruckingRecord,
};
use haulbook_db::RecordRepository;

/// Creates the trucking record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trucking", get(list_records).post(create_record))
        .route("/trucking/{id}", put(update_record).delete(delete_record))
        .route("/trucking/{id}/delete-file", post(delete_file))
}

/// Build the lifecycle coordinator for one request.
fn service(state: &AppState) -> RecordService<RecordRepository> {
    RecordService::new(
        state.store.clone(),
        Arc::new(RecordRepository::new((*state.db).clone())),
    )
}

/// Request body for removing one attachment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    /// Storage reference of the blob to remove.
    pub file_path: String,
}

/// GET `/trucking` - list records, newest first.
async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<TruckingRecord>>, ApiError> {
    let repo = RecordRepository::new((*state.db).clone());
    Ok(Json(repo.list_records().await?))
}

/// POST `/trucking` - create a record with its uploaded attachments.
async fn create_record(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TruckingRecord>, ApiError> {
    let form = extractors::read_record_form(&mut multipart).await?;
    let (input, invoice_files, lifting_file) = form.into_create_parts();

    let record = service(&state)
        .create_record(input, invoice_files, lifting_file)
        .await?;

    Ok(Json(record))
}

/// PUT `/trucking/{id}` - amend scalar fields, append invoice files, and
/// replace the lifting invoice when a new one is uploaded.
async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = extractors::read_record_form(&mut multipart).await?;
    let (update, invoice_files, lifting_file) = form.into_update_parts();

    service(&state)
        .amend_record(id, update, invoice_files, lifting_file)
        .await?;

    Ok(Json(json!({ "message": "Updated" })))
}

/// DELETE `/trucking/{id}` - delete a record, cascading attachment cleanup.
async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    // an absent record still reports Deleted, matching the wire contract
    service(&state).delete_record(id).await?;

    Ok(Json(json!({ "message": "Deleted" })))
}

/// POST `/trucking/{id}/delete-file` - remove one attachment by storage
/// reference. Idempotent at the boundary: a missing record or an
/// unmatched reference still reports success.
async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeleteFileRequest>,
) -> Result<Json<Value>, ApiError> {
    match service(&state).remove_file(id, &payload.file_path).await {
        Ok(_) => {}
        Err(RecordError::NotFound(_)) => {
            debug!(record_id = %id, "delete-file for absent record");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(json!({ "message": "File deleted" })))
}
