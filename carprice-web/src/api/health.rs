//! Health check endpoint
//!
//! Only reachable once artifacts have loaded, so a 200 here means the
//! model and both encoders are in memory and predictions can be served.

use axum::{extract::State, routing::get, Json, Router};
use carprice_common::Regressor;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Loaded estimator, e.g. "tree ensemble (3 trees, Mean, 5 features)"
    pub model: String,
    pub company_categories: usize,
    pub fuel_type_categories: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = &state.artifacts;
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: artifacts.model().describe(),
        company_categories: artifacts.company_encoder().category_count(),
        fuel_type_categories: artifacts.fuel_type_encoder().category_count(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
