//! Canonical upload-key generation.
//!
//! Key format: `uploads/{user_id}/{millis}-{random}.{ext}`. The uploading
//! user's id namespaces the key, the millisecond timestamp plus random
//! component make it unique and unpredictable, and the extension is carried
//! over from the original filename so stored objects stay recognizable.

use crate::traits::{StorageError, StorageResult};
use chrono::Utc;
use uuid::Uuid;

const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_LEN: usize = 10;

/// Generate a fresh upload key for the given user and original filename.
///
/// Every call produces a distinct key, even for identical filenames from the
/// same user: retries after a failed batch must never reuse a slot.
pub fn upload_key(user_id: Uuid, filename: &str) -> StorageResult<String> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(StorageError::InvalidKey(
            "File name must not be empty".to_string(),
        ));
    }

    Ok(format!(
        "uploads/{}/{}-{}.{}",
        user_id,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension_of(filename)
    ))
}

/// Extract a sanitized lowercase extension, falling back to `bin` when the
/// filename has none or it is unusable as a key segment.
fn extension_of(filename: &str) -> String {
    let extension = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => return FALLBACK_EXTENSION.to_string(),
    };

    if extension.len() > MAX_EXTENSION_LEN
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return FALLBACK_EXTENSION.to_string();
    }

    extension
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Uuid {
        Uuid::parse_str("6f2d02f1-6f45-4f6e-9e10-0d3f6a1c2b4d").unwrap()
    }

    #[test]
    fn test_key_shape() {
        let key = upload_key(user(), "pothole.JPG").unwrap();
        assert!(key.starts_with(&format!("uploads/{}/", user())));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_keys_are_unique_across_attempts() {
        let first = upload_key(user(), "evidence.jpg").unwrap();
        let second = upload_key(user(), "evidence.jpg").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_extension_falls_back_to_bin() {
        let key = upload_key(user(), "voicenote").unwrap();
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_hidden_file_falls_back_to_bin() {
        let key = upload_key(user(), ".env").unwrap();
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_hostile_extension_is_sanitized() {
        let key = upload_key(user(), "clip.mp4/../../etc").unwrap();
        assert!(key.ends_with(".bin"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            upload_key(user(), "   "),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
