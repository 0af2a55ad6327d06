//! Object storage for uploaded media.
//!
//! [`ObjectStore`] abstracts the S3-compatible backend (Cloudflare R2 in
//! production) behind get/put/delete/signed-URL operations. The in-memory
//! implementation backs tests and local development. The image pipeline
//! re-encodes every upload as JPEG and produces a square thumbnail.

pub mod image_pipeline;
pub mod memory;
pub mod s3;
pub mod store;
pub mod upload;

pub use image_pipeline::{process_image, ImageLimits, ProcessedImage};
pub use memory::MemoryObjectStore;
pub use s3::{S3Config, S3ObjectStore};
pub use store::{ObjectStore, StorageError};
pub use upload::{store_image, StoredUpload};
