//! UI serving routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::form::PredictForm;
use crate::page::{render_page, Outcome};
use crate::AppState;

const CARPRICE_CSS: &str = include_str!("../../ui/carprice.css");

/// GET /
///
/// Idle form; nothing is computed until the user presses Predict
pub async fn serve_index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state, &PredictForm::default(), &Outcome::Idle))
}

/// GET /static/carprice.css
pub async fn serve_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], CARPRICE_CSS).into_response()
}
