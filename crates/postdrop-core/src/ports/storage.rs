//! Object storage port.

use async_trait::async_trait;

use crate::domain::{Post, merge_server};
use crate::error::StorageError;

/// Storage trait - abstraction over object storage backends (S3/R2, in-memory).
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Store a media file for a post. Returns a URL referencing the object.
    async fn upload_media_file(
        &self,
        post_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Store the metadata record of a post.
    async fn upload_post_metadata(&self, post_id: &str, post: &Post) -> Result<(), StorageError>;

    /// Fetch the metadata record of a post.
    async fn get_post_metadata(&self, post_id: &str) -> Result<Option<Post>, StorageError>;

    /// Remove a media file. Removing a missing object is not an error.
    async fn delete_media_file(&self, post_id: &str, filename: &str) -> Result<(), StorageError>;

    /// Current server registry. Empty when none was written yet.
    async fn get_servers_list(&self) -> Result<Vec<String>, StorageError>;

    /// Overwrite the server registry.
    async fn update_servers_list(&self, servers: &[String]) -> Result<(), StorageError>;

    /// Add a server to the registry and return the stored list.
    ///
    /// The default is a plain read-modify-write: concurrent callers can lose
    /// each other's additions. Backends with an atomic primitive should
    /// override it.
    async fn add_server(&self, server: &str) -> Result<Vec<String>, StorageError> {
        let current = self.get_servers_list().await?;
        let updated = merge_server(current, server);
        self.update_servers_list(&updated).await?;
        Ok(updated)
    }
}
