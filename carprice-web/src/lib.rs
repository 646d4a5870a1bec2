//! carprice-web library - Car price prediction form
//!
//! Serves a single page with the prediction form. Artifacts are loaded by the
//! binary before the router is built and shared read-only across requests.

use axum::Router;
use carprice_common::config::PredictionSettings;
use carprice_common::{Artifacts, Predictor};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod form;
pub mod page;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Model and encoders, immutable after startup
    pub artifacts: Arc<Artifacts>,
    /// Reference year, year bounds and currency symbol
    pub settings: Arc<PredictionSettings>,
}

impl AppState {
    /// Create new application state
    pub fn new(artifacts: Artifacts, settings: PredictionSettings) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            settings: Arc::new(settings),
        }
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(&self.artifacts, self.settings.reference_year)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/predict", post(api::submit_prediction))
        .route("/static/carprice.css", get(api::serve_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
