//! In-memory storage implementation - used as fallback when no bucket is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use postdrop_core::StorageError;
use postdrop_core::domain::{Post, merge_server};
use postdrop_core::ports::PostStorage;

use super::{JSON_CONTENT_TYPE, SERVERS_KEY, media_key, metadata_key};

/// An object held by [`InMemoryPostStorage`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory object store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryPostStorage {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a raw object by key.
    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn read_servers(objects: &HashMap<String, StoredObject>) -> Result<Vec<String>, StorageError> {
        match objects.get(SERVERS_KEY) {
            Some(object) => Ok(serde_json::from_slice(&object.bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_servers(
        objects: &mut HashMap<String, StoredObject>,
        servers: &[String],
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(servers)?;
        objects.insert(
            SERVERS_KEY.to_string(),
            StoredObject {
                bytes,
                content_type: JSON_CONTENT_TYPE.to_string(),
            },
        );
        Ok(())
    }
}

impl Default for InMemoryPostStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStorage for InMemoryPostStorage {
    async fn upload_media_file(
        &self,
        post_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = media_key(post_id, filename);
        let mut objects = self.objects.write().await;
        objects.insert(
            key.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{key}"))
    }

    async fn upload_post_metadata(&self, post_id: &str, post: &Post) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(post)?;
        let mut objects = self.objects.write().await;
        objects.insert(
            metadata_key(post_id),
            StoredObject {
                bytes,
                content_type: JSON_CONTENT_TYPE.to_string(),
            },
        );
        Ok(())
    }

    async fn get_post_metadata(&self, post_id: &str) -> Result<Option<Post>, StorageError> {
        let objects = self.objects.read().await;
        objects
            .get(&metadata_key(post_id))
            .map(|object| serde_json::from_slice(&object.bytes))
            .transpose()
            .map_err(StorageError::from)
    }

    async fn delete_media_file(&self, post_id: &str, filename: &str) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;
        objects.remove(&media_key(post_id, filename));
        Ok(())
    }

    async fn get_servers_list(&self) -> Result<Vec<String>, StorageError> {
        let objects = self.objects.read().await;
        Self::read_servers(&objects)
    }

    async fn update_servers_list(&self, servers: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;
        Self::write_servers(&mut objects, servers)
    }

    /// Read, merge and write under one write lock, so concurrent adds never
    /// lose each other.
    async fn add_server(&self, server: &str) -> Result<Vec<String>, StorageError> {
        let mut objects = self.objects.write().await;
        let updated = merge_server(Self::read_servers(&objects)?, server);
        Self::write_servers(&mut objects, &updated)?;
        Ok(updated)
    }
}
