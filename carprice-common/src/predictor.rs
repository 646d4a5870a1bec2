//! Feature builder -> model chain for one submission

use crate::artifacts::Artifacts;
use crate::features::{CarQuery, FeatureBuilder, FeatureVector};
use crate::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// Outcome of one successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub features: FeatureVector,
    pub price: f64,
}

/// Runs a [`CarQuery`] through the loaded artifacts
///
/// Stateless: two identical queries always give identical results.
#[derive(Clone, Copy)]
pub struct Predictor<'a> {
    artifacts: &'a Artifacts,
    builder: FeatureBuilder<'a>,
}

impl<'a> Predictor<'a> {
    pub fn new(artifacts: &'a Artifacts, reference_year: i32) -> Self {
        Self {
            artifacts,
            builder: FeatureBuilder::new(
                artifacts.company_encoder(),
                artifacts.fuel_type_encoder(),
                reference_year,
            ),
        }
    }

    pub fn predict(&self, query: &CarQuery) -> Result<Prediction> {
        let features = self.builder.build(query)?;
        let price = self.predict_features(&features)?;

        // Codes must map back to the submitted labels
        let company = self.artifacts.company_encoder().decode(features.company_code)?;
        let fuel_type = self.artifacts.fuel_type_encoder().decode(features.fuel_code)?;
        debug!(company, fuel_type, ?features, price, "Prediction computed");
        Ok(Prediction { features, price })
    }

    /// Invoke the model after checking the row fits its schema
    pub fn predict_features(&self, features: &FeatureVector) -> Result<f64> {
        let model = self.artifacts.model();
        let schema = model.schema();
        schema.validate()?;

        let price = model.predict_row(&features.to_row(schema))?;
        if !price.is_finite() {
            return Err(Error::InvalidPrediction(price));
        }
        Ok(price)
    }
}
