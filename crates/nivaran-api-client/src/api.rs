//! Domain methods for the Nivaran API client.

use crate::upload::{LocalFile, UploadError};
use crate::ApiClient;
use anyhow::Result;
use nivaran_core::models::{AuthResponse, ReportResponse, SignupRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// `{ message, report }` envelope returned by detail endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub message: String,
    pub report: ReportResponse,
}

/// `{ message, count, reports }` envelope returned by list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListEnvelope {
    pub message: String,
    pub count: usize,
    pub reports: Vec<ReportResponse>,
}

/// Response of a successful report submission.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponse {
    pub message: String,
    pub report_id: Uuid,
    pub report: ReportResponse,
}

/// Report submission failure: either the upload pipeline aborted (no report
/// was created) or the submission endpoint itself rejected the report.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Report submission failed: {0}")]
    Submission(#[source] anyhow::Error),
}

/// In-progress report form state, owned by the submitting screen.
///
/// Attachment multiplicity is the screen's policy: any number of images, at
/// most one video, at most one audio note. Upload order (and therefore key
/// order) is images, then video, then audio; the first file becomes the
/// cover image.
#[derive(Debug, Default, Clone)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub department: String,
    images: Vec<LocalFile>,
    video: Option<LocalFile>,
    audio: Option<LocalFile>,
}

impl ReportDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        ReportDraft {
            title: title.into(),
            description: description.into(),
            location: location.into(),
            department: department.into(),
            ..Default::default()
        }
    }

    pub fn add_image(&mut self, image: LocalFile) -> &mut Self {
        self.images.push(image);
        self
    }

    /// Replaces any previously attached video.
    pub fn set_video(&mut self, video: LocalFile) -> &mut Self {
        self.video = Some(video);
        self
    }

    /// Replaces any previously attached audio note.
    pub fn set_audio(&mut self, audio: LocalFile) -> &mut Self {
        self.audio = Some(audio);
        self
    }

    /// All attachments in upload order.
    pub fn files(&self) -> Vec<LocalFile> {
        let mut files = self.images.clone();
        files.extend(self.video.clone());
        files.extend(self.audio.clone());
        files
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportBody<'a> {
    title: &'a str,
    description: &'a str,
    location: &'a str,
    department: &'a str,
    file_paths: Vec<String>,
}

impl ApiClient {
    /// Register a citizen account. Installs the returned token.
    pub async fn signup(&mut self, request: &SignupRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self.post_json("/api/auth/signup", request).await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    /// Log in and install the returned token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .post_json(
                "/api/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    /// Submit a complaint report: upload every attachment through the
    /// signed-URL pipeline, then persist the report referencing the resulting
    /// object keys.
    ///
    /// The pipeline is all-or-nothing: if any upload fails, submission is
    /// never attempted and no report exists. Retrying submits a fresh attempt
    /// with newly minted slots.
    pub async fn submit_report(
        &self,
        draft: &ReportDraft,
    ) -> Result<CreateReportResponse, SubmitError> {
        let files = draft.files();
        let file_paths = self.upload_files(&files).await?;

        let body = CreateReportBody {
            title: &draft.title,
            description: &draft.description,
            location: &draft.location,
            department: &draft.department,
            file_paths,
        };

        self.post_json("/api/user/reports", &body)
            .await
            .map_err(SubmitError::Submission)
    }

    /// Track a single report by id.
    pub async fn track_report(&self, report_id: Uuid) -> Result<ReportEnvelope> {
        self.get(&format!("/api/user/reports/{}", report_id), &[])
            .await
    }

    /// List the caller's own reports, newest first.
    pub async fn my_reports(&self) -> Result<ReportListEnvelope> {
        self.get("/api/user/my-reports", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str) -> LocalFile {
        LocalFile::new(name, content_type, vec![1, 2, 3])
    }

    #[test]
    fn test_draft_orders_files_images_video_audio() {
        let mut draft = ReportDraft::new("t", "d", "l", "roads");
        draft.set_audio(file("note.mp3", "audio/mpeg"));
        draft.add_image(file("one.jpg", "image/jpeg"));
        draft.set_video(file("clip.mp4", "video/mp4"));
        draft.add_image(file("two.jpg", "image/jpeg"));

        let names: Vec<_> = draft.files().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["one.jpg", "two.jpg", "clip.mp4", "note.mp3"]);
    }

    #[test]
    fn test_draft_keeps_single_video_and_audio() {
        let mut draft = ReportDraft::new("t", "d", "l", "roads");
        draft.set_video(file("first.mp4", "video/mp4"));
        draft.set_video(file("second.mp4", "video/mp4"));
        draft.set_audio(file("first.mp3", "audio/mpeg"));
        draft.set_audio(file("second.mp3", "audio/mpeg"));

        let names: Vec<_> = draft.files().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["second.mp4", "second.mp3"]);
    }

    #[test]
    fn test_empty_draft_has_no_files() {
        let draft = ReportDraft::new("t", "d", "l", "roads");
        assert!(draft.files().is_empty());
    }
}
