//! S3-compatible object storage (AWS S3, Cloudflare R2, MinIO).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use postdrop_core::StorageError;
use postdrop_core::domain::Post;
use postdrop_core::ports::PostStorage;

use super::{JSON_CONTENT_TYPE, SERVERS_KEY, media_key, metadata_key};

/// S3 connection configuration.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket holding media, metadata and the server registry.
    pub bucket: String,
    /// Region ("auto" for R2).
    pub region: String,
    /// Custom endpoint for S3-compatible storage.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Public base URL used to build media URLs (CDN or bucket domain).
    pub public_base_url: Option<String>,
    pub force_path_style: bool,
    /// Timeout of the bucket check performed on startup.
    pub connect_timeout: Duration,
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `S3_BUCKET` is not set.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok().filter(|b| !b.is_empty())?;
        let endpoint = std::env::var("S3_ENDPOINT").ok().filter(|e| !e.is_empty());

        Some(Self {
            bucket,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string()),
            force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(endpoint.is_some()),
            endpoint,
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
            connect_timeout: Duration::from_secs(
                std::env::var("S3_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        })
    }

    /// URL of an object: under the public base URL when set, else `s3://`.
    pub fn object_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("s3://{}/{}", self.bucket, key),
        }
    }
}

/// S3-backed post storage.
///
/// The server registry keeps the default read-modify-write `add_server`;
/// concurrent adds can lose each other.
pub struct S3PostStorage {
    client: Client,
    config: S3Config,
}

impl S3PostStorage {
    /// Build a client and check that the bucket is reachable.
    pub async fn new(config: S3Config) -> Result<Self, StorageError> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // Otherwise the default credential chain applies
        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "postdrop_s3",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();
        let client = Client::from_conf(s3_config);

        tokio::time::timeout(
            config.connect_timeout,
            client.head_bucket().bucket(&config.bucket).send(),
        )
        .await
        .map_err(|_| StorageError::Connection("Bucket check timed out".to_string()))?
        .map_err(|e| StorageError::Connection(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(bucket = %config.bucket, endpoint = ?config.endpoint, "Connected to S3 storage");

        Ok(Self { client, config })
    }

    /// Create from environment configuration, `None` when no bucket is set.
    pub async fn from_env() -> Option<Result<Self, StorageError>> {
        let config = S3Config::from_env()?;
        Some(Self::new(config).await)
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Operation(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(key = %key, "S3 PUT");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::Operation(DisplayErrorContext(&e).to_string()));
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Operation(e.to_string()))?;
        Ok(Some(body.into_bytes().to_vec()))
    }
}

#[async_trait]
impl PostStorage for S3PostStorage {
    async fn upload_media_file(
        &self,
        post_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = media_key(post_id, filename);
        self.put(&key, bytes, content_type).await?;
        Ok(self.config.object_url(&key))
    }

    async fn upload_post_metadata(&self, post_id: &str, post: &Post) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(post)?;
        self.put(&metadata_key(post_id), body, JSON_CONTENT_TYPE).await
    }

    async fn get_post_metadata(&self, post_id: &str) -> Result<Option<Post>, StorageError> {
        match self.get(&metadata_key(post_id)).await? {
            Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
            None => Ok(None),
        }
    }

    async fn delete_media_file(&self, post_id: &str, filename: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(media_key(post_id, filename))
            .send()
            .await
            .map_err(|e| StorageError::Operation(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn get_servers_list(&self) -> Result<Vec<String>, StorageError> {
        match self.get(SERVERS_KEY).await? {
            Some(body) => Ok(serde_json::from_slice(&body)?),
            None => Ok(Vec::new()),
        }
    }

    async fn update_servers_list(&self, servers: &[String]) -> Result<(), StorageError> {
        let body = serde_json::to_vec(servers)?;
        self.put(SERVERS_KEY, body, JSON_CONTENT_TYPE).await
    }
}
