pub mod report;
pub mod upload;
pub mod user;

pub use report::{
    CloseReportRequest, CreateReportRequest, ReportResponse, ReportStatus, ReporterSummary,
    UpdateStatusRequest,
};
pub use upload::{FileSpec, UploadSlot, UploadUrlsRequest, UploadUrlsResponse};
pub use user::{AuthResponse, LoginRequest, SignupRequest, User, UserResponse, UserRole};
