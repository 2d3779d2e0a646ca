//! Domain entities - the core business objects.

mod post;
mod post_id;
mod servers;
mod submission;

pub use post::{Post, fallback_media_name};
pub use post_id::PostIdGenerator;
pub use servers::merge_server;
pub use submission::{DEFAULT_CONTENT_TYPE, MediaFile, PostSubmission, ValidSubmission};
