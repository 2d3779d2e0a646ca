//! # Postdrop Core
//!
//! The domain layer of Postdrop.
//! This crate contains the post model, the upload pipeline, and the storage
//! port it talks to. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{StorageError, UploadError};
pub use service::{PostUploader, UploadReceipt};
