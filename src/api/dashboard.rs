use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::{AppError, AppState, blocking};
use crate::services::dashboard::{self, AggregationWindow, DashboardSummary};

/// `GET /dashboard[?from=<RFC 3339>&to=<RFC 3339>]`
pub async fn summary(
    State(state): State<AppState>,
    window: Result<Query<AggregationWindow>, QueryRejection>,
) -> Result<Json<DashboardSummary>, AppError> {
    let Query(window) = window.map_err(|e| AppError::Validation(e.body_text()))?;
    window.validate().map_err(AppError::Validation)?;

    let stores = state.stores.clone();
    let factors = state.factors.clone();
    let summary = blocking(move || Ok(dashboard::summarize(&stores, &factors, &window)?)).await?;
    Ok(Json(summary))
}
