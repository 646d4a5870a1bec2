//! Regression model artifact
//!
//! The model is exported by an external training pipeline as JSON. It carries
//! its own [`FeatureSchema`] so the column order is checked rather than
//! assumed, plus the estimator parameters. Two estimator kinds are supported:
//!
//! - `linear`: intercept + dot(coefficients, row)
//! - `tree_ensemble`: base score + mean or sum of regression tree outputs
//!   (random forest / gradient boosting exports)

use crate::features::FeatureSchema;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything that maps one encoded row to a price
pub trait Regressor: Send + Sync {
    /// Column layout the regressor was trained on
    fn schema(&self) -> &FeatureSchema;

    /// Predict for one row laid out in [`Regressor::schema`] order
    fn predict_row(&self, row: &[f64]) -> Result<f64>;

    /// Year vehicle age was computed against at training time, if recorded
    fn reference_year(&self) -> Option<i32> {
        None
    }

    /// Short human-readable summary for logs and the health endpoint
    fn describe(&self) -> String {
        format!("regressor ({} features)", self.schema().width())
    }
}

/// Serialized model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Required: a model without a column contract is a corrupt artifact
    pub schema: FeatureSchema,
    /// Year vehicle age was computed against when the model was trained
    #[serde(default)]
    pub reference_year: Option<i32>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearParams),
    TreeEnsemble(TreeEnsembleParams),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest style
    #[default]
    Mean,
    /// Gradient boosting style
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleParams {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

/// Regression tree stored as a flat node array rooted at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

impl Tree {
    /// Children must point forward, which rules out cycles
    fn validate(&self, width: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::SchemaMismatch("tree has no nodes".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= width {
                    return Err(Error::SchemaMismatch(format!(
                        "node {} splits on feature {} but the schema has {} fields",
                        idx, feature, width
                    )));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(Error::SchemaMismatch(format!(
                            "node {} has invalid child index {}",
                            idx, child
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { leaf } => return leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Loaded, validated model
#[derive(Debug, Clone)]
pub struct Model {
    schema: FeatureSchema,
    reference_year: Option<i32>,
    estimator: Estimator,
}

impl Model {
    /// Validate an artifact and wrap it
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.schema.validate()?;
        let width = artifact.schema.width();

        match &artifact.estimator {
            Estimator::Linear(params) => {
                if params.coefficients.len() != width {
                    return Err(Error::SchemaMismatch(format!(
                        "linear model has {} coefficients but the schema has {} fields",
                        params.coefficients.len(),
                        width
                    )));
                }
            }
            Estimator::TreeEnsemble(params) => {
                if params.trees.is_empty() {
                    return Err(Error::SchemaMismatch(
                        "tree ensemble has no trees".to_string(),
                    ));
                }
                for tree in &params.trees {
                    tree.validate(width)?;
                }
            }
        }

        Ok(Self {
            schema: artifact.schema,
            reference_year: artifact.reference_year,
            estimator: artifact.estimator,
        })
    }

    /// Load a model artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::artifact(path, format!("cannot read model: {}", e)))?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| Error::artifact(path, format!("corrupt model: {}", e)))?;
        Self::from_artifact(artifact).map_err(|e| Error::artifact(path, e.to_string()))
    }

}

impl Regressor for Model {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.schema.width() {
            return Err(Error::SchemaMismatch(format!(
                "model expects {} features, got {}",
                self.schema.width(),
                row.len()
            )));
        }

        let value = match &self.estimator {
            Estimator::Linear(p) => {
                p.intercept
                    + p.coefficients
                        .iter()
                        .zip(row)
                        .map(|(w, x)| w * x)
                        .sum::<f64>()
            }
            Estimator::TreeEnsemble(p) => {
                let total: f64 = p.trees.iter().map(|t| t.predict(row)).sum();
                let combined = match p.aggregation {
                    Aggregation::Mean => total / p.trees.len() as f64,
                    Aggregation::Sum => total,
                };
                p.base_score + combined
            }
        };

        Ok(value)
    }

    fn reference_year(&self) -> Option<i32> {
        self.reference_year
    }

    fn describe(&self) -> String {
        match &self.estimator {
            Estimator::Linear(_) => format!("linear ({} features)", self.schema.width()),
            Estimator::TreeEnsemble(p) => format!(
                "tree ensemble ({} trees, {:?}, {} features)",
                p.trees.len(),
                p.aggregation,
                self.schema.width()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Model {
        Model::from_artifact(ModelArtifact {
            schema: FeatureSchema::default(),
            reference_year: Some(2023),
            estimator: Estimator::Linear(LinearParams {
                intercept: 100.0,
                coefficients: vec![1.0, 2.0, 0.5, 10.0, -3.0],
            }),
        })
        .unwrap()
    }

    /// Splits on kms_driven (column 2) then on age (column 4)
    fn forest(aggregation: Aggregation) -> Model {
        let json = r#"{
            "schema": {"version": 1, "fields": ["company", "year", "kms_driven", "fuel_type", "age"]},
            "reference_year": 2023,
            "estimator": {
                "kind": "tree_ensemble",
                "base_score": 1000.0,
                "trees": [
                    {"nodes": [
                        {"feature": 2, "threshold": 60000.0, "left": 1, "right": 2},
                        {"leaf": 500.0},
                        {"leaf": 100.0}
                    ]},
                    {"nodes": [
                        {"feature": 4, "threshold": 5.0, "left": 1, "right": 2},
                        {"leaf": 300.0},
                        {"leaf": 50.0}
                    ]}
                ]
            }
        }"#;
        let mut artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        if let Estimator::TreeEnsemble(ref mut p) = artifact.estimator {
            p.aggregation = aggregation;
        }
        Model::from_artifact(artifact).unwrap()
    }

    #[test]
    fn test_linear_prediction() {
        let model = linear();
        let y = model.predict_row(&[2.0, 2015.0, 50000.0, 1.0, 8.0]).unwrap();
        assert_eq!(y, 100.0 + 2.0 + 4030.0 + 25000.0 + 10.0 - 24.0);
    }

    #[test]
    fn test_tree_ensemble_mean_and_sum() {
        let row = [0.0, 2015.0, 50000.0, 0.0, 8.0];
        // tree 1 -> 500 (kms <= 60000), tree 2 -> 50 (age > 5)
        assert_eq!(forest(Aggregation::Mean).predict_row(&row).unwrap(), 1275.0);
        assert_eq!(forest(Aggregation::Sum).predict_row(&row).unwrap(), 1550.0);
    }

    #[test]
    fn test_default_aggregation_is_mean() {
        let artifact: ModelArtifact = serde_json::from_str(
            r#"{"schema": {"version": 1, "fields": ["company", "year", "kms_driven", "fuel_type", "age"]}, "estimator": {"kind": "tree_ensemble", "trees": [{"nodes": [{"leaf": 7.0}]}]}}"#,
        )
        .unwrap();
        let model = Model::from_artifact(artifact).unwrap();
        assert_eq!(model.reference_year(), None);
        assert_eq!(model.predict_row(&[0.0; 5]).unwrap(), 7.0);
    }

    #[test]
    fn test_schema_is_required() {
        let result: std::result::Result<ModelArtifact, _> = serde_json::from_str(
            r#"{"estimator": {"kind": "linear", "intercept": 0.0, "coefficients": [1.0, 1.0, 1.0, 1.0, 1.0]}}"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("schema"), "error: {}", err);
    }

    #[test]
    fn test_row_width_mismatch() {
        let err = linear().predict_row(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_coefficient_count_must_match_schema() {
        let artifact = ModelArtifact {
            schema: FeatureSchema::default(),
            reference_year: None,
            estimator: Estimator::Linear(LinearParams {
                intercept: 0.0,
                coefficients: vec![1.0, 2.0, 3.0],
            }),
        };
        assert!(matches!(
            Model::from_artifact(artifact),
            Err(Error::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_tree_rejects_backward_child() {
        let artifact: ModelArtifact = serde_json::from_str(
            r#"{"schema": {"version": 1, "fields": ["company", "year", "kms_driven", "fuel_type", "age"]}, "estimator": {"kind": "tree_ensemble", "trees": [{"nodes": [
                {"feature": 0, "threshold": 1.0, "left": 0, "right": 1},
                {"leaf": 1.0}
            ]}]}}"#,
        )
        .unwrap();
        assert!(Model::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_tree_rejects_feature_out_of_range() {
        let artifact: ModelArtifact = serde_json::from_str(
            r#"{"schema": {"version": 1, "fields": ["company", "year", "kms_driven", "fuel_type", "age"]}, "estimator": {"kind": "tree_ensemble", "trees": [{"nodes": [
                {"feature": 9, "threshold": 1.0, "left": 1, "right": 2},
                {"leaf": 1.0},
                {"leaf": 2.0}
            ]}]}}"#,
        )
        .unwrap();
        assert!(Model::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(linear().describe(), "linear (5 features)");
        assert!(forest(Aggregation::Sum).describe().contains("2 trees"));
    }
}
