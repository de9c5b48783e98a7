//! Storage module for uploaded images
//!
//! Provides the local uploads directory that holds original photos and their
//! annotated renderings, served back under the static route.

mod upload_store;

pub use upload_store::UploadStore;
