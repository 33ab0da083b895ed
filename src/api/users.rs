//! Administrator-only user management.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::auth::{RegisterRequest, create_user, parse_role, validate_email};
use crate::api::{AppError, AppState, blocking, parse_body, path_id};
use crate::db::models::{User, UserChanges};
use crate::store::StoreError;

/// Profile edit; absent or empty fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> Result<UserChanges, AppError> {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let email = non_empty(self.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }
        let role = match non_empty(self.role) {
            Some(raw) => Some(parse_role(&raw)?.to_string()),
            None => None,
        };

        Ok(UserChanges {
            name: non_empty(self.name),
            email,
            role,
            updated_at: Some(Utc::now()),
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(add))
        .route("/users/{id}", put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let stores = state.stores.clone();
    let users = blocking(move || {
        stores
            .users
            .list()
            .map_err(|e| AppError::from_store(e, "retrieve", "users"))
    })
    .await?;
    Ok(Json(users))
}

async fn add(State(state): State<AppState>, body: Bytes) -> Result<(StatusCode, Json<Value>), AppError> {
    let req: RegisterRequest = parse_body(&body)?;
    let stores = state.stores.clone();
    let cost = state.bcrypt_cost;
    let id = blocking(move || create_user(&stores, req, cost)).await?;

    info!("Added user {}", id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User added successfully", "user_id": id })),
    ))
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let id = path_id(id)?;
    let changes = parse_body::<UpdateUserRequest>(&body)?.into_changes()?;

    let stores = state.stores.clone();
    blocking(move || {
        stores.users.update(id, changes).map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Validation("Email is already registered".to_string()),
            other => AppError::from_store(other, "update", "user"),
        })
    })
    .await?;

    info!("Updated user {}", id);
    Ok(Json(json!({ "message": "User updated successfully" })))
}

async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = path_id(id)?;
    let stores = state.stores.clone();
    blocking(move || {
        stores
            .users
            .delete(id)
            .map_err(|e| AppError::from_store(e, "delete", "user"))
    })
    .await?;

    info!("Deleted user {}", id);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_left_alone() {
        let changes = UpdateUserRequest {
            name: Some("  ".into()),
            email: None,
            role: Some("viewer".into()),
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.email, None);
        assert_eq!(changes.role.as_deref(), Some("viewer"));
        assert!(changes.updated_at.is_some());
    }

    #[test]
    fn bad_role_or_email_is_rejected() {
        let bad_role = UpdateUserRequest {
            role: Some("root".into()),
            ..Default::default()
        };
        assert!(matches!(bad_role.into_changes(), Err(AppError::Validation(_))));

        let bad_email = UpdateUserRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(bad_email.into_changes(), Err(AppError::Validation(_))));
    }
}
