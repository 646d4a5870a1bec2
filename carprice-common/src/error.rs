//! Common error types for the car price predictor

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for car price operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the artifact loader, feature builder and predictor
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact file missing, unreadable or structurally invalid
    #[error("Artifact error ({}): {reason}", path.display())]
    Artifact { path: PathBuf, reason: String },

    /// Category string not known to an encoder
    #[error("Out-of-vocabulary {encoder} value: {value:?}")]
    OutOfVocabulary { encoder: String, value: String },

    /// Integer code with no category in an encoder
    #[error("Unknown {encoder} code: {code}")]
    UnknownCode { encoder: String, code: i64 },

    /// Feature vector does not fit the model's expected input
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Model produced NaN or infinity
    #[error("Model produced a non-finite prediction: {0}")]
    InvalidPrediction(f64),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Build an [`Error::Artifact`] for `path`
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Artifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the submitted values rather than the model
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::OutOfVocabulary { .. } | Error::InvalidInput(_)
        )
    }
}
