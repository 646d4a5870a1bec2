//! Startup artifacts
//!
//! The model and the two encoders are loaded exactly once, before the HTTP
//! listener is bound. Any failure here is fatal: there is no partial-start
//! mode and no retry.

use crate::encoder::CategoricalEncoder;
use crate::model::{Model, Regressor};
use crate::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub company_encoder: PathBuf,
    pub fuel_type_encoder: PathBuf,
}

/// Read-only artifacts shared by every prediction
pub struct Artifacts {
    model: Box<dyn Regressor>,
    company: CategoricalEncoder,
    fuel_type: CategoricalEncoder,
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("schema", self.model.schema())
            .field("company", &self.company.category_count())
            .field("fuel_type", &self.fuel_type.category_count())
            .finish()
    }
}

impl Artifacts {
    /// Deserialize all three artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        info!("Loading model from {}", paths.model.display());
        let model = Model::load(&paths.model)?;
        info!("✓ Model loaded: {}", model.describe());

        info!(
            "Loading company encoder from {}",
            paths.company_encoder.display()
        );
        let company = CategoricalEncoder::load(&paths.company_encoder, "company")?;
        info!("✓ Company encoder loaded: {} categories", company.category_count());

        info!(
            "Loading fuel type encoder from {}",
            paths.fuel_type_encoder.display()
        );
        let fuel_type = CategoricalEncoder::load(&paths.fuel_type_encoder, "fuel_type")?;
        info!("✓ Fuel type encoder loaded: {} categories", fuel_type.category_count());

        Ok(Self::from_parts(Box::new(model), company, fuel_type))
    }

    /// Assemble from already-built parts (tests substitute the model here)
    pub fn from_parts(
        model: Box<dyn Regressor>,
        company: CategoricalEncoder,
        fuel_type: CategoricalEncoder,
    ) -> Self {
        Self {
            model,
            company,
            fuel_type,
        }
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn company_encoder(&self) -> &CategoricalEncoder {
        &self.company
    }

    pub fn fuel_type_encoder(&self) -> &CategoricalEncoder {
        &self.fuel_type
    }
}
