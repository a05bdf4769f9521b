//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The complaint system's storage surface is intentionally small:
//! mint presigned PUT URLs for direct client uploads, and check whether an
//! object key refers to a real object before a report may reference it.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway abstraction.
///
/// Backends (S3, local filesystem) implement this trait so the upload
/// coordinator and report submission work with any backend without coupling
/// to implementation details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a presigned PUT URL for a direct client upload.
    ///
    /// The returned URL permits a single PUT to `storage_key` until it
    /// expires. Only supported by S3-compatible backends; others return a
    /// `ConfigError`.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check whether an object exists under the given key.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
