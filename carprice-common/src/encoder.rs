//! Categorical encoder
//!
//! A fitted mapping between a finite, ordered set of string categories and
//! integer codes. The code of a category is its index in the vocabulary, so the
//! vocabulary order is part of the contract with whatever exported the model.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// On-disk form of an encoder artifact
///
/// ```json
/// { "name": "company", "classes": ["Audi", "BMW", "Maruti"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderParams {
    /// Feature this encoder belongs to (used in error messages)
    #[serde(default)]
    pub name: Option<String>,
    /// Categories in code order
    pub classes: Vec<String>,
}

/// Fitted categorical encoder, immutable after construction
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    name: String,
    classes: Vec<String>,
    class_to_code: HashMap<String, i64>,
}

impl CategoricalEncoder {
    /// Build an encoder from an ordered vocabulary
    ///
    /// Fails on an empty vocabulary or a repeated category.
    pub fn new(name: impl Into<String>, classes: Vec<String>) -> Result<Self> {
        let name = name.into();
        if classes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} encoder has an empty vocabulary",
                name
            )));
        }

        let mut class_to_code = HashMap::with_capacity(classes.len());
        for (idx, class) in classes.iter().enumerate() {
            if class_to_code.insert(class.clone(), idx as i64).is_some() {
                return Err(Error::InvalidInput(format!(
                    "{} encoder lists {:?} more than once",
                    name, class
                )));
            }
        }

        Ok(Self {
            name,
            classes,
            class_to_code,
        })
    }

    /// Reconstruct from serialized parameters
    ///
    /// `default_name` is used when the artifact does not name itself.
    pub fn from_params(params: EncoderParams, default_name: &str) -> Result<Self> {
        let name = params.name.unwrap_or_else(|| default_name.to_string());
        Self::new(name, params.classes)
    }

    /// Load an encoder artifact from a JSON file
    pub fn load(path: &Path, default_name: &str) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::artifact(path, format!("cannot read encoder: {}", e)))?;
        let params: EncoderParams = serde_json::from_slice(&bytes)
            .map_err(|e| Error::artifact(path, format!("corrupt encoder: {}", e)))?;
        Self::from_params(params, default_name).map_err(|e| Error::artifact(path, e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Known categories in code order
    pub fn vocabulary(&self) -> &[String] {
        &self.classes
    }

    pub fn category_count(&self) -> usize {
        self.classes.len()
    }

    /// Category -> code
    pub fn encode(&self, category: &str) -> Result<i64> {
        self.class_to_code
            .get(category)
            .copied()
            .ok_or_else(|| Error::OutOfVocabulary {
                encoder: self.name.clone(),
                value: category.to_string(),
            })
    }

    /// Code -> category
    pub fn decode(&self, code: i64) -> Result<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownCode {
                encoder: self.name.clone(),
                code,
            })
    }
}
