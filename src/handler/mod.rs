//! HTTP handler infrastructure.
//!
//! Organized into:
//! - `routes`: route definitions and request/response shapes
//! - `middleware`: request logging and metrics emission
//!
//! All responses are JSON; errors carry a human-readable `message` field
//! with a status from the [`crate::error::ApiError`] taxonomy.

pub mod middleware;
pub mod routes;

pub use routes::create_router;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::auth::TokenVerifier;
use crate::error::ApiError;
use crate::service::AppService;
use crate::store::Store;
use crate::telemetry::AppMetrics;

/// State shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub verifier: TokenVerifier,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new(store: Arc<Store>, verifier: TokenVerifier, metrics: Arc<AppMetrics>) -> Self {
        Self {
            service: AppService::new(store, Arc::clone(&metrics)),
            verifier,
            metrics,
        }
    }
}

/// JSON body extractor that reports malformed input as a 400 with a
/// descriptive message instead of axum's default rejection.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(ValidJson(value))
    }
}
