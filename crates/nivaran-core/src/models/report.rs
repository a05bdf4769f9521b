use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Triage status of a report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in-progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl TryFrom<String> for ReportStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "in-progress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

/// Reporter fields joined into report responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReporterSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Report as returned by the API, reporter joined.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub media_urls: Vec<String>,
    pub location: String,
    pub department: String,
    pub status: ReportStatus,
    pub flag: bool,
    pub created_by: ReporterSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Citizen report submission. `filePaths` is the ordered object-key list
/// produced by the upload pipeline; the first entry is the cover image.
/// May be empty: a report can be filed without evidence.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 300, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, max = 120, message = "Department is required"))]
    pub department: String,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

/// Status change by a head administrator or department official.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
}

/// Final closing submission by a department official: resolution proof
/// uploaded through the same signed-URL protocol.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CloseReportRequest {
    #[validate(length(min = 1, message = "Solved image path is required"))]
    pub solved_image_path: String,
    #[serde(default)]
    pub solved_media_paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
        ] {
            let parsed = ReportStatus::try_from(status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(ReportStatus::try_from("closed".to_string()).is_err());
    }

    #[test]
    fn test_status_wire_format_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: ReportStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, ReportStatus::InProgress);
    }

    #[test]
    fn test_create_report_accepts_empty_file_paths() {
        let request: CreateReportRequest = serde_json::from_value(serde_json::json!({
            "title": "Open drain on 4th cross",
            "description": "Drain cover missing for two weeks",
            "location": "Ward 12, 4th cross",
            "department": "sanitation"
        }))
        .unwrap();
        assert!(request.file_paths.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_report_wire_field_is_camel_case() {
        let request: CreateReportRequest = serde_json::from_value(serde_json::json!({
            "title": "Broken streetlight",
            "description": "Pole 14 dark at night",
            "location": "MG Road",
            "department": "electrical",
            "filePaths": ["uploads/u1/1-a.jpg", "uploads/u1/1-b.mp4"]
        }))
        .unwrap();
        assert_eq!(request.file_paths.len(), 2);
        assert_eq!(request.file_paths[0], "uploads/u1/1-a.jpg");
    }

    #[test]
    fn test_close_report_request_shape() {
        let request: CloseReportRequest = serde_json::from_value(serde_json::json!({
            "solvedImagePath": "uploads/u2/9-fixed.jpg"
        }))
        .unwrap();
        assert!(request.solved_media_paths.is_empty());
        assert!(request.validate().is_ok());
    }
}
