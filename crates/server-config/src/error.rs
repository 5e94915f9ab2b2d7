//! Model values errors

use thiserror::Error;

/// Errors that can occur while producing model values
#[derive(Debug, Error)]
pub enum ServerConfigError {
    /// The model could not be converted into a JSON document
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The provider refused to produce a model for the request
    #[error("Model values unavailable: {0}")]
    Unavailable(String),
}
