pub mod auth;
pub mod department;
pub mod files;
pub mod head;
pub mod health;
pub mod reports;

use nivaran_core::models::ReportResponse;
use serde::Serialize;
use utoipa::ToSchema;

/// `{ message, report }` envelope used by detail and mutation endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportEnvelope {
    pub message: String,
    pub report: ReportResponse,
}

/// `{ message, count, reports }` envelope used by list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportListEnvelope {
    pub message: String,
    pub count: usize,
    pub reports: Vec<ReportResponse>,
}

impl ReportListEnvelope {
    pub fn new(message: impl Into<String>, reports: Vec<ReportResponse>) -> Self {
        ReportListEnvelope {
            message: message.into(),
            count: reports.len(),
            reports,
        }
    }
}
