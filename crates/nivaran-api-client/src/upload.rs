//! Upload executor: turns local files into confirmed remote objects.
//!
//! One submission attempt is one batch: the executor requests a fresh slot
//! batch from the coordinator, PUTs every file directly to the storage
//! gateway, and hands the ordered key list to report submission only if every
//! upload succeeded. A failed attempt is terminal - retrying starts over with
//! newly minted slots, never by resubmitting old ones (signed URLs may have
//! expired or been partially consumed).

use crate::ApiClient;
use futures::future::join_all;
use nivaran_core::models::{FileSpec, UploadSlot, UploadUrlsRequest, UploadUrlsResponse};
use reqwest::StatusCode;
use thiserror::Error;

/// A file attached to a submission attempt: declared name/type plus bytes.
/// Ephemeral - lives only for the duration of one attempt.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        LocalFile {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Upload pipeline failures.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing or rejected bearer credential at the coordinator.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The coordinator rejected the file-descriptor batch.
    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    /// The storage gateway (or the coordinator on its behalf) failed: slot
    /// minting error, non-2xx on a PUT, or a transport failure.
    #[error("Upstream storage error: {0}")]
    UpstreamStorage(String),

    /// Slot batch does not match the request batch. Indicates a client or
    /// server bug, not a retryable condition.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
}

/// Pair minted slots with the files they were minted for.
///
/// Pairing is positional; a length mismatch, or a `sourceName` that
/// contradicts the entry at the same index, means the batches cannot be
/// trusted and the attempt is abandoned.
pub(crate) fn pair_slots(
    files: &[LocalFile],
    slots: Vec<UploadSlot>,
) -> Result<Vec<UploadSlot>, UploadError> {
    if slots.len() != files.len() {
        return Err(UploadError::ProtocolViolation(format!(
            "Requested {} upload slots but received {}",
            files.len(),
            slots.len()
        )));
    }

    for (index, (file, slot)) in files.iter().zip(&slots).enumerate() {
        if slot.file_name.trim().is_empty() {
            return Err(UploadError::ProtocolViolation(format!(
                "Slot {} has an empty object key",
                index
            )));
        }
        if let Some(ref source_name) = slot.source_name {
            if source_name != &file.name {
                return Err(UploadError::ProtocolViolation(format!(
                    "Slot {} was minted for '{}' but file '{}' is at that index",
                    index, source_name, file.name
                )));
            }
        }
    }

    Ok(slots)
}

impl ApiClient {
    /// Upload a batch of files through the signed-URL pipeline.
    ///
    /// Returns the ordered object-key list on full success; by convention the
    /// first key is the report's cover image. Zero files is valid input: the
    /// coordinator is not called and an empty list is returned. If any single
    /// upload fails the whole batch fails and no keys are returned.
    pub async fn upload_files(&self, files: &[LocalFile]) -> Result<Vec<String>, UploadError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let request = UploadUrlsRequest {
            files: files
                .iter()
                .map(|file| FileSpec {
                    name: file.name.clone(),
                    content_type: file.content_type.clone(),
                })
                .collect(),
        };

        let slots = self.request_upload_slots(&request).await?;
        let slots = pair_slots(files, slots)?;

        // Uploads are independent (disjoint slot/key pairs) and run
        // concurrently; join_all preserves input order for the outcomes.
        let outcomes = join_all(
            files
                .iter()
                .zip(&slots)
                .map(|(file, slot)| self.put_file(file, slot)),
        )
        .await;

        let mut keys = Vec::with_capacity(outcomes.len());
        let mut first_failure: Option<UploadError> = None;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(key) => keys.push(key),
                Err(error) => {
                    tracing::warn!(index, error = %error, "File upload failed");
                    if first_failure.is_none() {
                        first_failure = Some(error);
                    }
                }
            }
        }

        // All-or-nothing: a partial batch is never handed downstream.
        if let Some(error) = first_failure {
            return Err(error);
        }

        tracing::debug!(count = keys.len(), "Upload batch completed");
        Ok(keys)
    }

    /// Request one signed upload slot per file from the coordinator.
    async fn request_upload_slots(
        &self,
        request: &UploadUrlsRequest,
    ) -> Result<Vec<UploadSlot>, UploadError> {
        let url = self.build_url("/api/files/get-upload-urls");
        let response = self
            .apply_auth(self.raw_client().post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                UploadError::UpstreamStorage(format!("Failed to reach upload coordinator: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED => UploadError::Unauthorized(body),
                StatusCode::BAD_REQUEST => UploadError::InvalidRequest(body),
                _ => UploadError::UpstreamStorage(format!(
                    "Coordinator returned {}: {}",
                    status, body
                )),
            });
        }

        let batch: UploadUrlsResponse = response.json().await.map_err(|e| {
            UploadError::ProtocolViolation(format!("Malformed slot batch: {}", e))
        })?;

        Ok(batch.upload_urls)
    }

    /// PUT one file's bytes to its slot's signed URL.
    async fn put_file(&self, file: &LocalFile, slot: &UploadSlot) -> Result<String, UploadError> {
        let response = self
            .raw_client()
            .put(&slot.signed_url)
            .header("Content-Type", file.content_type.clone())
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| {
                UploadError::UpstreamStorage(format!("Upload failed for {}: {}", file.name, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::UpstreamStorage(format!(
                "Upload failed for {}: {} - {}",
                file.name, status, body
            )));
        }

        Ok(slot.file_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> LocalFile {
        LocalFile::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    fn slot(key: &str, source: Option<&str>) -> UploadSlot {
        UploadSlot {
            file_name: key.to_string(),
            signed_url: format!("https://gateway.mock/{}?sig=x", key),
            source_name: source.map(String::from),
        }
    }

    #[test]
    fn test_pair_slots_accepts_matching_batch() {
        let files = vec![file("a.jpg"), file("b.jpg")];
        let slots = vec![
            slot("uploads/u/1-a.jpg", Some("a.jpg")),
            slot("uploads/u/1-b.jpg", Some("b.jpg")),
        ];
        let paired = pair_slots(&files, slots).unwrap();
        assert_eq!(paired.len(), 2);
        assert_eq!(paired[0].file_name, "uploads/u/1-a.jpg");
    }

    #[test]
    fn test_pair_slots_accepts_positional_only_batch() {
        // Servers that omit sourceName still pair positionally.
        let files = vec![file("a.jpg")];
        let slots = vec![slot("uploads/u/1-a.jpg", None)];
        assert!(pair_slots(&files, slots).is_ok());
    }

    #[test]
    fn test_pair_slots_rejects_short_batch() {
        let files = vec![file("a.jpg"), file("b.jpg")];
        let slots = vec![slot("uploads/u/1-a.jpg", Some("a.jpg"))];
        assert!(matches!(
            pair_slots(&files, slots),
            Err(UploadError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_pair_slots_rejects_reordered_batch() {
        let files = vec![file("a.jpg"), file("b.jpg")];
        let slots = vec![
            slot("uploads/u/1-b.jpg", Some("b.jpg")),
            slot("uploads/u/1-a.jpg", Some("a.jpg")),
        ];
        assert!(matches!(
            pair_slots(&files, slots),
            Err(UploadError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_pair_slots_rejects_empty_key() {
        let files = vec![file("a.jpg")];
        let slots = vec![slot("", Some("a.jpg"))];
        assert!(matches!(
            pair_slots(&files, slots),
            Err(UploadError::ProtocolViolation(_))
        ));
    }
}
