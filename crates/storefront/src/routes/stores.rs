//! Store configuration API handlers.

use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The default store's configuration file.
///
/// # Route
///
/// `GET /api/store-config`
///
/// # Errors
///
/// Returns 500 if `config.json` is missing or not valid JSON.
pub async fn store_config(State(state): State<AppState>) -> Result<Json<Value>> {
    let config = state
        .stores()
        .load_config()
        .await
        .map_err(|e| AppError::store(e, "Failed to load store configuration"))?;
    Ok(Json(config))
}

/// Every valid store, each tagged with a `storeId`.
///
/// # Route
///
/// `GET /api/all-stores`
///
/// # Errors
///
/// Returns 500 if the stores directory cannot be read.
pub async fn all_stores(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    let stores = state
        .stores()
        .load_all()
        .await
        .map_err(|e| AppError::store(e, "Failed to load stores"))?;
    Ok(Json(stores))
}
