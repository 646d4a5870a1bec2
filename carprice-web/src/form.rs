//! Prediction form submission
//!
//! The browser enforces the control constraints (year range, non-negative
//! kilometers), but a POST can be crafted by hand, so the same constraints are
//! applied again here before anything reaches the feature builder. Category
//! strings are passed through untouched; the encoders decide whether they are
//! known.

use carprice_common::config::PredictionSettings;
use carprice_common::{CarQuery, Error, Result};
use serde::Deserialize;

/// Raw urlencoded form fields, kept as strings so they can be echoed back
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub kms_driven: String,
}

impl PredictForm {
    /// Apply the control constraints and produce a query
    pub fn to_query(&self, settings: &PredictionSettings) -> Result<CarQuery> {
        if self.company.is_empty() {
            return Err(Error::InvalidInput("Select a company".to_string()));
        }
        if self.fuel_type.is_empty() {
            return Err(Error::InvalidInput("Select a fuel type".to_string()));
        }

        let year: i32 = self.year.trim().parse().map_err(|_| {
            Error::InvalidInput(format!(
                "Year of Manufacture must be a whole number, got {:?}",
                self.year
            ))
        })?;
        if !settings.year_in_range(year) {
            return Err(Error::InvalidInput(format!(
                "Year of Manufacture must be between {} and {}, got {}",
                settings.min_year, settings.max_year, year
            )));
        }

        let kms_driven: u64 = self.kms_driven.trim().parse().map_err(|_| {
            Error::InvalidInput(format!(
                "Kilometers Driven must be a whole number of at least 0, got {:?}",
                self.kms_driven
            ))
        })?;

        Ok(CarQuery {
            company: self.company.clone(),
            fuel_type: self.fuel_type.clone(),
            year,
            kms_driven,
        })
    }
}
