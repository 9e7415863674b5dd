//! Carrier reference-data routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use haulbook_core::record::{
    Carrier, CreateCarrierInput, RecordRepository as RecordRepoTrait,
};
use haulbook_db::RecordRepository;

/// Creates the carrier routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/carriers", get(list_carriers).post(create_carrier))
        .route("/carriers/{id}", delete(delete_carrier))
}

/// Request body for creating a carrier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarrierRequest {
    /// Carrier company name.
    pub name: String,
    /// Tax registration code.
    pub tax_code: String,
    /// Internal lookup key.
    #[serde(default)]
    pub key: String,
}

/// GET `/carriers` - list carriers sorted by name.
async fn list_carriers(State(state): State<AppState>) -> Result<Json<Vec<Carrier>>, ApiError> {
    let repo = RecordRepository::new((*state.db).clone());
    Ok(Json(repo.list_carriers().await?))
}

/// POST `/carriers` - create a carrier; duplicates report 400.
async fn create_carrier(
    State(state): State<AppState>,
    Json(payload): Json<CreateCarrierRequest>,
) -> Result<Json<Carrier>, ApiError> {
    let repo = RecordRepository::new((*state.db).clone());
    let carrier = repo
        .create_carrier(CreateCarrierInput {
            name: payload.name,
            tax_code: payload.tax_code,
            key: payload.key,
        })
        .await?;

    info!(carrier_id = %carrier.id, "carrier created");
    Ok(Json(carrier))
}

/// DELETE `/carriers/{id}` - delete a carrier; absent ids succeed.
async fn delete_carrier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let repo = RecordRepository::new((*state.db).clone());
    repo.delete_carrier(id).await?;

    info!(carrier_id = %id, "carrier deleted");
    Ok(Json(json!({ "message": "Deleted" })))
}
