//! HTTP surface: routing, role gates, CORS and the server loop.

use axum::{
    Router,
    extract::{Path, rejection::PathRejection},
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
    },
    middleware,
    routing::{get, post},
};
use log::{error, info};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::{ADMIN_ONLY, ANY_ROLE, DATA_ENTRY, TokenService};
use crate::config::Config;
use crate::db::models::{
    Accommodation, Electricity, FoodConsumption, GoodsPurchased, Population, Transport, Waste, WaterConsumption,
    WaterTreatment,
};
use crate::services::emission_factors::EmissionFactors;
use crate::store::Stores;
use crate::utils::parse_json;

pub mod error;
pub mod auth;
pub mod dashboard;
pub mod records;
pub mod users;

pub use error::AppError;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub tokens: Arc<TokenService>,
    pub factors: Arc<EmissionFactors>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(stores: Stores, config: &Config) -> Self {
        AppState {
            stores,
            tokens: Arc::new(TokenService::new(config.jwt_secret.as_bytes())),
            factors: Arc::new(EmissionFactors::default()),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

pub fn router(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    let measurements = Router::new()
        .merge(records::routes::<Electricity>())
        .merge(records::routes::<WaterConsumption>())
        .merge(records::routes::<WaterTreatment>())
        .merge(records::routes::<Waste>())
        .merge(records::routes::<Transport>())
        .merge(records::routes::<Accommodation>())
        .merge(records::routes::<FoodConsumption>())
        .merge(records::routes::<GoodsPurchased>())
        .merge(records::routes::<Population>())
        .route_layer(middleware::from_fn_with_state(DATA_ENTRY, auth::require_role));

    let user_admin = users::routes().route_layer(middleware::from_fn_with_state(ADMIN_ONLY, auth::require_role));

    let dashboard = Router::new()
        .route("/dashboard", get(dashboard::summary))
        .route_layer(middleware::from_fn_with_state(ANY_ROLE, auth::require_role));

    // Added last so it wraps the role gates: 401 always wins over 403.
    let protected = Router::new()
        .merge(measurements)
        .merge(user_admin)
        .merge(dashboard)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::authenticate));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE);

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: &Config, state: AppState) -> Result<(), String> {
    let app = router(state, config.cors_allowed_origins.clone());

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("Binding {} failed: {}", config.bind_addr, e))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Runs blocking store work off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal("Background task failed", e))?
}

pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    parse_json(body).map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
}

pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(_) => Err(AppError::Validation("Invalid ID".to_string())),
    }
}
