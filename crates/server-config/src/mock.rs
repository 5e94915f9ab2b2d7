//! Mock model values provider for unit testing
//!
//! Returns a canned document (or a canned failure) and records every request
//! it receives, so tests can assert on what the caller asked for.

use std::sync::{Arc, Mutex};

use crate::error::ServerConfigError;
use crate::{ModelValuesProvider, ModelValuesRequest};

#[derive(Debug, Clone)]
enum Response {
    Document(serde_json::Value),
    Failure(String),
}

/// Mock provider with a fixed response
#[derive(Debug, Clone)]
pub struct MockModelValues {
    response: Response,
    requests: Arc<Mutex<Vec<ModelValuesRequest>>>,
}

impl MockModelValues {
    /// Always answer with `document`
    pub fn returning(document: serde_json::Value) -> Self {
        Self {
            response: Response::Document(document),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always fail with [`ServerConfigError::Unavailable`]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Response::Failure(message.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ModelValuesRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ModelValuesProvider for MockModelValues {
    fn model_values(
        &self,
        request: &ModelValuesRequest,
    ) -> Result<serde_json::Value, ServerConfigError> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        match &self.response {
            Response::Document(document) => Ok(document.clone()),
            Response::Failure(message) => Err(ServerConfigError::Unavailable(message.clone())),
        }
    }
}
