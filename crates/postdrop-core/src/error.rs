//! Domain-level error types.

use thiserror::Error;

/// Message returned to clients when a required field or the file is missing.
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage connection failed: {0}")]
    Connection(String),

    #[error("Storage operation failed: {0}")]
    Operation(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Upload pipeline failures.
///
/// Only [`UploadError::Validation`] is meant for the caller. The storage
/// variants are kept apart so the failing step shows up in logs.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Media upload failed: {0}")]
    MediaUpload(#[source] StorageError),

    #[error("Metadata upload failed (orphaned media removed: {media_removed}): {source}")]
    MetadataUpload {
        #[source]
        source: StorageError,
        media_removed: bool,
    },

    #[error("Server registry update failed: {0}")]
    RegistryUpdate(#[source] StorageError),
}

impl UploadError {
    pub fn missing_fields() -> Self {
        UploadError::Validation(MISSING_REQUIRED_FIELDS.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::Validation(_))
    }
}
