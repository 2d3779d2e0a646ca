//! # Postdrop Infrastructure
//!
//! Concrete implementations of the ports defined in `postdrop-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `s3` - S3-compatible object storage via the AWS SDK

pub mod storage;

// Re-exports - In-Memory
pub use storage::InMemoryPostStorage;

// Re-exports - S3
#[cfg(feature = "s3")]
pub use storage::{S3Config, S3PostStorage};
