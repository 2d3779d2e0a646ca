//! Helpers for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::TestRequest;
use async_trait::async_trait;

use postdrop_core::StorageError;
use postdrop_core::domain::Post;
use postdrop_core::ports::PostStorage;
use postdrop_infra::InMemoryPostStorage;

const BOUNDARY: &str = "----postdrop-test-boundary";

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(self, name: &str, value: &str) -> Self {
        self.raw_text(name, value.as_bytes())
    }

    /// Text part with arbitrary bytes as its value.
    pub fn raw_text(mut self, name: &str, value: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                .as_bytes(),
        );
        self.body.extend_from_slice(value);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(
        mut self,
        name: &str,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Self {
        let mut head = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"");
        if let Some(filename) = filename {
            head.push_str(&format!("; filename=\"{filename}\""));
        }
        head.push_str("\r\n");
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        head.push_str("\r\n");

        self.body.extend_from_slice(head.as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> TestRequest {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        TestRequest::post()
            .uri(uri)
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(self.body)
    }
}

/// In-memory storage that counts calls and can fail metadata writes.
///
/// Keeps the default `add_server`, so registry reads and writes show up in
/// the counters.
#[derive(Default)]
pub struct CountingStorage {
    pub inner: InMemoryPostStorage,
    fail_metadata: bool,
    calls: AtomicUsize,
    media_writes: AtomicUsize,
    registry_reads: AtomicUsize,
    registry_writes: AtomicUsize,
}

impl CountingStorage {
    pub fn failing_metadata() -> Self {
        Self {
            fail_metadata: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn media_writes(&self) -> usize {
        self.media_writes.load(Ordering::SeqCst)
    }

    pub fn registry_reads(&self) -> usize {
        self.registry_reads.load(Ordering::SeqCst)
    }

    pub fn registry_writes(&self) -> usize {
        self.registry_writes.load(Ordering::SeqCst)
    }

    fn hit(&self, counter: &AtomicUsize) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PostStorage for CountingStorage {
    async fn upload_media_file(
        &self,
        post_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.hit(&self.media_writes);
        self.inner
            .upload_media_file(post_id, filename, bytes, content_type)
            .await
    }

    async fn upload_post_metadata(&self, post_id: &str, post: &Post) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_metadata {
            return Err(StorageError::Operation("injected metadata fault".to_string()));
        }
        self.inner.upload_post_metadata(post_id, post).await
    }

    async fn get_post_metadata(&self, post_id: &str) -> Result<Option<Post>, StorageError> {
        self.inner.get_post_metadata(post_id).await
    }

    async fn delete_media_file(&self, post_id: &str, filename: &str) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_media_file(post_id, filename).await
    }

    async fn get_servers_list(&self) -> Result<Vec<String>, StorageError> {
        self.hit(&self.registry_reads);
        self.inner.get_servers_list().await
    }

    async fn update_servers_list(&self, servers: &[String]) -> Result<(), StorageError> {
        self.hit(&self.registry_writes);
        self.inner.update_servers_list(servers).await
    }
}
