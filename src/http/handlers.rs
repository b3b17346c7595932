//! Request handlers translating HTTP calls into store operations.
//!
//! | Route | Method | Store operation |
//! |---|---|---|
//! | `/configs` | GET | list |
//! | `/configs` | POST | put |
//! | `/configs/{name}` | GET | get |
//! | `/configs/{name}` | PUT, PATCH | update |
//! | `/configs/{name}` | DELETE | delete |
//! | `/search?metadata.<path>=<value>` | GET | search |
//! | `/status` | GET | len |

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::store::{ConfigRecord, StoreError};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub status: &'static str,
    pub records: usize,
}

pub async fn list_configs(State(state): State<AppState>) -> Json<Vec<ConfigRecord>> {
    let records = state.store.list();
    tracing::debug!(count = records.len(), "Listing configs");
    Json(records)
}

/// Create or overwrite a record. Requires a JSON content type.
pub async fn create_config(
    State(state): State<AppState>,
    payload: Result<Json<ConfigRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload?;
    let name = record.name.clone();
    state.store.put(record)?;
    tracing::info!(name = %name, "Config created");
    Ok(StatusCode::OK)
}

pub async fn get_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ConfigRecord>, ApiError> {
    Ok(Json(state.store.get(&name)?))
}

/// Replace the record stored under `name` with the request body.
///
/// The body is decoded as JSON whatever content type it declares.
pub async fn update_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let body = body?;
    let record: ConfigRecord = serde_json::from_slice(&body)
        .map_err(|e| StoreError::invalid(format!("malformed config body: {}", e)))?;
    state.store.update(&name, record)?;
    tracing::info!(name = %name, "Config updated");
    Ok(StatusCode::OK)
}

pub async fn delete_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&name)?;
    tracing::info!(name = %name, "Config deleted");
    Ok(StatusCode::OK)
}

/// Search with a single `metadata.<path>=<value>` query pair.
pub async fn search_configs(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<ConfigRecord>>, ApiError> {
    let Query(pairs) = query?;
    let (path, value) = match pairs.as_slice() {
        [(path, value)] => (path, value),
        [] => return Err(StoreError::invalid("search needs a metadata.<path>=<value> query").into()),
        _ => return Err(StoreError::invalid("search accepts exactly one query parameter").into()),
    };
    Ok(Json(state.store.search(path, value)?))
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        records: state.store.len(),
    })
}
