//! Storage implementations - S3-compatible object storage and in-memory fallback.
//!
//! Every backend uses the same object layout:
//!
//! - `posts/<post_id>/media/<filename>` - the uploaded media file
//! - `posts/<post_id>/metadata.json` - the post record
//! - `servers.json` - the server registry, a JSON array of strings

mod memory;

#[cfg(feature = "s3")]
mod s3;

pub use memory::{InMemoryPostStorage, StoredObject};

#[cfg(feature = "s3")]
pub use s3::{S3Config, S3PostStorage};

/// Key of the server registry object.
pub const SERVERS_KEY: &str = "servers.json";

/// Content type of JSON objects written by the backends.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Key of a post's media file.
pub fn media_key(post_id: &str, filename: &str) -> String {
    format!("posts/{post_id}/media/{filename}")
}

/// Key of a post's metadata record.
pub fn metadata_key(post_id: &str) -> String {
    format!("posts/{post_id}/metadata.json")
}
