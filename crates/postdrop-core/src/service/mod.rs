//! Application services - orchestration over the ports.

mod upload;

pub use upload::{PostUploader, UploadReceipt};
