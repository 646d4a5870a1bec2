//! # Car Price Common Library
//!
//! Everything the web front end needs to turn a form submission into a price:
//! - Startup artifact loading (model + two categorical encoders)
//! - Feature schema and feature builder
//! - Regression model evaluation
//! - Currency formatting
//! - Configuration loading

pub mod artifacts;
pub mod config;
pub mod currency;
pub mod encoder;
pub mod error;
pub mod features;
pub mod model;
pub mod predictor;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use encoder::CategoricalEncoder;
pub use error::{Error, Result};
pub use features::{CarQuery, FeatureBuilder, FeatureVector};
pub use model::{Model, Regressor};
pub use predictor::{Prediction, Predictor};
