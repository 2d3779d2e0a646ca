//! Data Transfer Objects - response bodies of the API.

use serde::{Deserialize, Serialize};

/// Message sent back after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Post uploaded successfully";

/// Response to a successful post upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub post_id: String,
}

impl UploadResponse {
    pub fn uploaded(post_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            post_id: post_id.into(),
        }
    }
}

/// Response listing the registered servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServersResponse {
    pub servers: Vec<String>,
}
