//! HTML rendering for the prediction page

use crate::form::PredictForm;
use crate::AppState;
use carprice_common::config::PredictionSettings;
use carprice_common::encoder::CategoricalEncoder;

/// Banner shown above the form after a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Idle,
    Success(String),
    Failure(String),
}

/// Escape text for element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `<option>` list for one encoder, in vocabulary order
fn render_options(encoder: &CategoricalEncoder, selected: &str) -> String {
    encoder
        .vocabulary()
        .iter()
        .map(|class| {
            let escaped = escape_html(class);
            let marker = if class == selected { " selected" } else { "" };
            format!(
                "                <option value=\"{}\"{}>{}</option>\n",
                escaped, marker, escaped
            )
        })
        .collect()
}

fn render_banner(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Idle => String::new(),
        Outcome::Success(msg) => format!(
            "<div class=\"banner success\" id=\"result\">{}</div>",
            escape_html(msg)
        ),
        Outcome::Failure(msg) => format!(
            "<div class=\"banner error\" id=\"result\">{}</div>",
            escape_html(msg)
        ),
    }
}

/// Year input value: the submitted one, else the lower bound
fn year_value(form: &PredictForm, settings: &PredictionSettings) -> String {
    if form.year.is_empty() {
        settings.min_year.to_string()
    } else {
        form.year.clone()
    }
}

/// Render the full page
///
/// `form` carries the last submission (or defaults) so the controls keep the
/// user's values after a prediction.
pub fn render_page(state: &AppState, form: &PredictForm, outcome: &Outcome) -> String {
    let settings = &state.settings;
    let kms_value = if form.kms_driven.is_empty() {
        "0".to_string()
    } else {
        form.kms_driven.clone()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Car Price Prediction App</title>
    <link rel="stylesheet" href="/static/carprice.css">
</head>
<body>
    <header>
        <h1>Car Price Prediction App</h1>
        <div class="build-info">v{version} [{git_hash}]</div>
    </header>
    <main class="container">
        {banner}
        <form method="post" action="/predict">
            <label for="company">Select Company</label>
            <select id="company" name="company">
{company_options}            </select>

            <label for="fuel_type">Select Fuel Type</label>
            <select id="fuel_type" name="fuel_type">
{fuel_options}            </select>

            <label for="year">Year of Manufacture</label>
            <input id="year" name="year" type="number" min="{min_year}" max="{max_year}" step="1" value="{year}" required>

            <label for="kms_driven">Kilometers Driven</label>
            <input id="kms_driven" name="kms_driven" type="number" min="0" step="1" value="{kms}" required>

            <button type="submit">Predict</button>
        </form>
    </main>
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        banner = render_banner(outcome),
        company_options = render_options(state.artifacts.company_encoder(), &form.company),
        fuel_options = render_options(state.artifacts.fuel_type_encoder(), &form.fuel_type),
        min_year = settings.min_year,
        max_year = settings.max_year,
        year = escape_html(&year_value(form, settings)),
        kms = escape_html(&kms_value),
    )
}
