//! Nivaran Storage Library
//!
//! Storage-gateway abstraction for the complaint system. The server never
//! proxies file bytes: clients upload directly to the object store through
//! short-lived presigned PUT URLs, and the backend only mints those URLs and
//! checks object existence.
//!
//! # Upload key format
//!
//! All upload keys use the layout `uploads/{user_id}/{millis}-{random}.{ext}`,
//! namespaced by the uploading user and made unpredictable by the timestamp
//! and random component. Keys must not contain `..` or a leading `/`. Key
//! generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::upload_key;
pub use local::LocalStorage;
pub use nivaran_core::config::StorageBackend;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
