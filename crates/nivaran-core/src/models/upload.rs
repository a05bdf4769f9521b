//! Wire contract for the signed-URL upload batch.
//!
//! The request and response sequences pair positionally: the slot at index
//! *i* belongs to the file described at index *i*. `sourceName` additionally
//! echoes the request entry so clients can cross-check the pairing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One file the client intends to upload: original name plus MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct FileSpec {
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 255, message = "File type is required"))]
    pub content_type: String,
}

/// Ordered batch of files to mint upload slots for. Must be non-empty;
/// a submission with no evidence skips this endpoint entirely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UploadUrlsRequest {
    #[validate(length(min = 1, message = "Files array required"), nested)]
    pub files: Vec<FileSpec>,
}

/// One minted upload slot: the canonical object key and a time-limited,
/// single-use signed PUT URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    /// Server-generated object key; what the report will reference.
    pub file_name: String,
    /// Presigned PUT URL, valid for a short fixed TTL.
    pub signed_url: String,
    /// Echo of the request entry's `name` at the same index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// Slot batch, same length and order as the request batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlsResponse {
    pub upload_urls: Vec<UploadSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request: UploadUrlsRequest = serde_json::from_value(serde_json::json!({
            "files": [
                { "name": "pothole.jpg", "type": "image/jpeg" },
                { "name": "clip.mp4", "type": "video/mp4" }
            ]
        }))
        .unwrap();
        assert_eq!(request.files.len(), 2);
        assert_eq!(request.files[1].content_type, "video/mp4");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_batch_fails_validation() {
        let request = UploadUrlsRequest { files: Vec::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let request = UploadUrlsRequest {
            files: vec![FileSpec {
                name: String::new(),
                content_type: "image/jpeg".to_string(),
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_wire_format() {
        let response = UploadUrlsResponse {
            upload_urls: vec![UploadSlot {
                file_name: "uploads/u1/171-abc.jpg".to_string(),
                signed_url: "https://gateway.example/put?sig=x".to_string(),
                source_name: Some("pothole.jpg".to_string()),
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("uploadUrls").is_some());
        let slot = &json["uploadUrls"][0];
        assert_eq!(slot["fileName"], "uploads/u1/171-abc.jpg");
        assert!(slot.get("signedUrl").is_some());
        assert_eq!(slot["sourceName"], "pothole.jpg");
    }

    #[test]
    fn test_slot_parses_without_source_name() {
        // Positional pairing is the interop contract; sourceName is optional.
        let slot: UploadSlot = serde_json::from_value(serde_json::json!({
            "fileName": "uploads/u1/171-abc.jpg",
            "signedUrl": "https://gateway.example/put?sig=x"
        }))
        .unwrap();
        assert!(slot.source_name.is_none());
    }
}
