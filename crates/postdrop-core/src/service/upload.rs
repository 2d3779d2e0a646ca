//! Post upload pipeline.

use std::sync::Arc;

use crate::domain::{Post, PostIdGenerator, PostSubmission, fallback_media_name};
use crate::error::UploadError;
use crate::ports::PostStorage;

/// Outcome of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub post_id: String,
    pub media_url: String,
    pub post: Post,
}

/// Runs an upload against a [`PostStorage`].
///
/// Steps run one after another: validate, store the media file, store the
/// metadata record, then register the server when one was given. The first
/// failing step aborts the rest.
pub struct PostUploader {
    storage: Arc<dyn PostStorage>,
    ids: PostIdGenerator,
}

impl PostUploader {
    pub fn new(storage: Arc<dyn PostStorage>) -> Self {
        Self {
            storage,
            ids: PostIdGenerator::new(),
        }
    }

    pub async fn upload(&self, submission: PostSubmission) -> Result<UploadReceipt, UploadError> {
        let mut submission = submission.validate()?;

        let post_id = self.ids.next_id();
        let media_file = submission
            .media
            .original_name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_media_name(&post_id));
        let content_type = submission.media.content_type_or_default().to_string();
        let bytes = std::mem::take(&mut submission.media.bytes);

        let media_url = self
            .storage
            .upload_media_file(&post_id, &media_file, bytes, &content_type)
            .await
            .map_err(UploadError::MediaUpload)?;

        tracing::debug!(post_id = %post_id, media_file = %media_file, "Media file stored");

        let post = Post::new(post_id.clone(), &submission, media_file.clone());

        if let Err(source) = self.storage.upload_post_metadata(&post_id, &post).await {
            let media_removed = self.remove_orphan(&post_id, &media_file).await;
            return Err(UploadError::MetadataUpload {
                source,
                media_removed,
            });
        }

        if let Some(server) = submission.registry_server() {
            let servers = self
                .storage
                .add_server(server)
                .await
                .map_err(UploadError::RegistryUpdate)?;
            tracing::debug!(server = %server, registry_size = servers.len(), "Server registered");
        }

        tracing::info!(post_id = %post_id, "Post uploaded");

        Ok(UploadReceipt {
            post_id,
            media_url,
            post,
        })
    }

    /// Best-effort removal of a media file whose metadata never made it.
    async fn remove_orphan(&self, post_id: &str, media_file: &str) -> bool {
        match self.storage.delete_media_file(post_id, media_file).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    post_id = %post_id,
                    media_file = %media_file,
                    error = %e,
                    "Failed to remove orphaned media file"
                );
                false
            }
        }
    }
}
