/// Image materialization module
///
/// This module handles:
/// - Decoding and re-encoding roster images as PNG (encode.rs)
/// - Accepting and reading player uploads (upload.rs)
/// - Ordered, bounded batch loading (batch.rs)

pub mod batch;
pub mod encode;
pub mod upload;

pub use batch::{materialize_remote, materialize_roster, materialize_uploads, BatchOutcome};
pub use upload::{accept, UploadFile};
