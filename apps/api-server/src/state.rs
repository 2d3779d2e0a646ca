//! Application state - shared across all handlers.

use std::sync::Arc;

use postdrop_core::PostUploader;
use postdrop_core::ports::PostStorage;
use postdrop_infra::InMemoryPostStorage;

use crate::config::AppConfig;

#[cfg(feature = "s3")]
use postdrop_infra::S3PostStorage;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn PostStorage>,
    pub uploader: Arc<PostUploader>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "s3")]
        let storage: Arc<dyn PostStorage> = match &config.storage {
            Some(s3) => match S3PostStorage::new(s3.clone()).await {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to object storage: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryPostStorage::new())
                }
            },
            None => {
                tracing::warn!("S3_BUCKET not set. Running without object storage (in-memory mode).");
                Arc::new(InMemoryPostStorage::new())
            }
        };

        #[cfg(not(feature = "s3"))]
        let storage: Arc<dyn PostStorage> = {
            let _ = config;
            tracing::info!("Running without s3 feature - using in-memory storage");
            Arc::new(InMemoryPostStorage::new())
        };

        tracing::info!("Application state initialized");

        Self::with_storage(storage)
    }

    /// Build the state around an existing storage backend.
    pub fn with_storage(storage: Arc<dyn PostStorage>) -> Self {
        Self {
            uploader: Arc::new(PostUploader::new(storage.clone())),
            storage,
        }
    }
}
