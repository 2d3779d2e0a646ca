//! Error response body.

use serde::{Deserialize, Serialize};

/// Error body: `{"error": "<message>"}`.
///
/// The message is meant for clients; failure details stay in the server logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    // Common error constructors
    pub fn upload_failed() -> Self {
        Self::new("Upload failed")
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(format!("{} not found", what.into()))
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}
