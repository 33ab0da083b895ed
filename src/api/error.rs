use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

use crate::services::dashboard::AggregationError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Forbidden: Insufficient permissions")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    Storage { message: String, details: String },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl AppError {
    /// Maps a store failure while performing `action` ("retrieve", "update", ...)
    /// on `what`.
    pub fn from_store(err: StoreError, action: &str, what: impl Display) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("{} {}", what, id)),
            StoreError::Conflict(details) => AppError::Validation(format!("Conflicting {}: {}", what, details)),
            StoreError::Storage(details) => AppError::Storage {
                message: format!("Failed to {} {}", action, what),
                details,
            },
        }
    }

    pub fn internal(message: impl Into<String>, details: impl Display) -> Self {
        AppError::Storage {
            message: message.into(),
            details: details.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AggregationError> for AppError {
    fn from(err: AggregationError) -> Self {
        AppError::Storage {
            message: format!("Failed to get {} data for dashboard", err.category),
            details: err.source.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            AppError::Storage { details, .. } => {
                error!("{}: {}", self, details);
                Some(details.as_str())
            }
            _ => {
                warn!("Request rejected ({}): {}", status.as_u16(), self);
                None
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Category;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found = AppError::from_store(StoreError::NotFound(3), "update", Category::Waste);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "waste entry 3 not found");

        let storage = AppError::from_store(StoreError::Storage("boom".into()), "update", Category::Waste);
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.to_string(), "Failed to update waste entry");

        let conflict = AppError::from_store(StoreError::Conflict("dup".into()), "add", "user");
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn aggregation_failure_names_the_category() {
        let err = AppError::from(AggregationError {
            category: Category::Transport,
            source: StoreError::Storage("timeout".into()),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to get transport entry data for dashboard");
    }
}
