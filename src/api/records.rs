//! CRUD handlers shared by every measurement category.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::get,
};
use log::info;
use serde_json::{Map, Value, json};

use crate::api::{AppError, AppState, blocking, parse_body, path_id};
use crate::store::Record;
use crate::utils::merge_patch;

/// Columns a client can never write.
const IMMUTABLE_FIELDS: &[&str] = &["id"];

/// `GET|POST <path>` and `GET|PUT|DELETE <path>/{id}` for one category.
pub fn routes<R: Record>() -> Router<AppState> {
    let path = R::CATEGORY.path();
    Router::new()
        .route(path, get(list::<R>).post(create::<R>))
        .route(&format!("{}/{{id}}", path), get(fetch::<R>).put(update::<R>).delete(remove::<R>))
}

async fn list<R: Record>(State(state): State<AppState>) -> Result<Json<Vec<R>>, AppError> {
    let stores = state.stores.clone();
    let rows = blocking(move || {
        stores
            .records::<R>()
            .list()
            .map_err(|e| AppError::from_store(e, "retrieve", R::CATEGORY))
    })
    .await?;
    Ok(Json(rows))
}

async fn fetch<R: Record>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<R>, AppError> {
    let id = path_id(id)?;
    let stores = state.stores.clone();
    let row = blocking(move || {
        stores
            .records::<R>()
            .get(id)
            .map_err(|e| AppError::from_store(e, "retrieve", R::CATEGORY))
    })
    .await?;
    Ok(Json(row))
}

async fn create<R: Record>(State(state): State<AppState>, body: Bytes) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut new: R::New = parse_body(&body)?;
    R::prepare(&mut new).map_err(AppError::Validation)?;

    let stores = state.stores.clone();
    let id = blocking(move || {
        stores
            .records::<R>()
            .create(new)
            .map_err(|e| AppError::from_store(e, "add", R::CATEGORY))
    })
    .await?;

    info!("Created {} {}", R::CATEGORY, id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("{} added successfully", R::CATEGORY), "id": id })),
    ))
}

/// Fields present in the body replace the stored ones, including zero and
/// `null`; absent fields are left as they are.
async fn update<R: Record>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let id = path_id(id)?;
    let patch: Map<String, Value> = parse_body(&body)?;

    let stores = state.stores.clone();
    blocking(move || {
        let store = stores.records::<R>();
        let current = store
            .get(id)
            .map_err(|e| AppError::from_store(e, "retrieve", R::CATEGORY))?;
        let mut merged: R::New = merge_patch(&current, patch, IMMUTABLE_FIELDS)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;
        R::prepare(&mut merged).map_err(AppError::Validation)?;
        store
            .update(id, merged)
            .map_err(|e| AppError::from_store(e, "update", R::CATEGORY))
    })
    .await?;

    info!("Updated {} {}", R::CATEGORY, id);
    Ok(Json(json!({ "message": format!("{} updated successfully", R::CATEGORY) })))
}

async fn remove<R: Record>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = path_id(id)?;
    let stores = state.stores.clone();
    blocking(move || {
        stores
            .records::<R>()
            .delete(id)
            .map_err(|e| AppError::from_store(e, "delete", R::CATEGORY))
    })
    .await?;

    info!("Deleted {} {}", R::CATEGORY, id);
    Ok(Json(json!({ "message": format!("{} deleted successfully", R::CATEGORY) })))
}
