//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod carriers;
pub mod health;
pub mod trucking;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(carriers::routes())
        .merge(trucking::routes())
}
