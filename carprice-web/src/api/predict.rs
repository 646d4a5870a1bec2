//! Prediction form submission
//!
//! Runs feature builder -> predictor -> presenter synchronously for each
//! submission and re-renders the page with the outcome. A failed submission
//! leaves nothing behind; the next one starts from scratch.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};
use carprice_common::currency::format_currency;
use carprice_common::Error;
use tracing::{info, warn};

use crate::form::PredictForm;
use crate::page::{render_page, Outcome};
use crate::AppState;

/// Map a prediction failure to the status the page is served with
fn failure_status(err: &Error) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /predict
pub async fn submit_prediction(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Rejected prediction form: {}", rejection);
            let outcome = Outcome::Failure(format!("Could not read form: {}", rejection));
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page(&state, &PredictForm::default(), &outcome)),
            );
        }
    };

    let result = form
        .to_query(&state.settings)
        .and_then(|query| state.predictor().predict(&query));

    match result {
        Ok(prediction) => {
            let price = format_currency(prediction.price, &state.settings.currency_symbol);
            info!(
                company = %form.company,
                fuel_type = %form.fuel_type,
                age = prediction.features.age,
                "Predicted {}",
                price
            );
            let outcome = Outcome::Success(format!("Predicted Car Price: {}", price));
            (StatusCode::OK, Html(render_page(&state, &form, &outcome)))
        }
        Err(err) => {
            warn!("Prediction failed: {}", err);
            let status = failure_status(&err);
            let outcome = Outcome::Failure(err.to_string());
            (status, Html(render_page(&state, &form, &outcome)))
        }
    }
}
