use chrono::{DateTime, Utc};
use nivaran_core::models::{ReportResponse, ReportStatus, ReporterSummary};
use nivaran_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Report row with the reporter joined in, as selected by every read query.
#[derive(Debug, sqlx::FromRow)]
pub struct JoinedReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub media_urls: Vec<String>,
    pub location: String,
    pub department: String,
    #[sqlx(try_from = "String")]
    pub status: ReportStatus,
    pub flag: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: String,
}

impl From<JoinedReport> for ReportResponse {
    fn from(row: JoinedReport) -> Self {
        ReportResponse {
            report_id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            media_urls: row.media_urls,
            location: row.location,
            department: row.department,
            status: row.status,
            flag: row.flag,
            created_by: ReporterSummary {
                id: row.created_by,
                name: row.reporter_name,
                email: row.reporter_email,
                phone: row.reporter_phone,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT r.id, r.title, r.description, r.image_url, r.media_urls,
           r.location, r.department, r.status, r.flag, r.created_by,
           r.created_at, r.updated_at,
           u.name AS reporter_name, u.email AS reporter_email,
           u.phone AS reporter_phone
    FROM reports r
    JOIN users u ON u.id = r.created_by
"#;

/// Repository for complaint reports
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new report. The key list has already been split by the
    /// caller: first key is the cover image, the rest are secondary media.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: String,
        description: String,
        image_url: Option<String>,
        media_urls: Vec<String>,
        location: String,
        department: String,
        created_by: Uuid,
    ) -> Result<JoinedReport, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO reports (id, title, description, image_url, media_urls,
                                 location, department, status, flag, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', FALSE, $8)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(image_url)
        .bind(media_urls)
        .bind(location)
        .bind(department)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Internal(format!("Report {} vanished after insert", id))
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<JoinedReport>, AppError> {
        let row = sqlx::query_as::<_, JoinedReport>(&format!("{} WHERE r.id = $1", JOINED_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_by_id_in_department(
        &self,
        id: Uuid,
        department: &str,
    ) -> Result<Option<JoinedReport>, AppError> {
        let row = sqlx::query_as::<_, JoinedReport>(&format!(
            "{} WHERE r.id = $1 AND r.department = $2",
            JOINED_SELECT
        ))
        .bind(id)
        .bind(department)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<JoinedReport>, AppError> {
        let rows = sqlx::query_as::<_, JoinedReport>(&format!(
            "{} ORDER BY r.created_at DESC",
            JOINED_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_creator(&self, created_by: Uuid) -> Result<Vec<JoinedReport>, AppError> {
        let rows = sqlx::query_as::<_, JoinedReport>(&format!(
            "{} WHERE r.created_by = $1 ORDER BY r.created_at DESC",
            JOINED_SELECT
        ))
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_department(&self, department: &str) -> Result<Vec<JoinedReport>, AppError> {
        let rows = sqlx::query_as::<_, JoinedReport>(&format!(
            "{} WHERE r.department = $1 ORDER BY r.created_at DESC",
            JOINED_SELECT
        ))
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_department_and_status(
        &self,
        department: &str,
        status: ReportStatus,
    ) -> Result<Vec<JoinedReport>, AppError> {
        let rows = sqlx::query_as::<_, JoinedReport>(&format!(
            "{} WHERE r.department = $1 AND r.status = $2 ORDER BY r.created_at DESC",
            JOINED_SELECT
        ))
        .bind(department)
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Update status without a department restriction (head administrator).
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<JoinedReport>, AppError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            "UPDATE reports SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Update status, restricted to the official's own department.
    pub async fn update_status_in_department(
        &self,
        id: Uuid,
        department: &str,
        status: ReportStatus,
    ) -> Result<Option<JoinedReport>, AppError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE reports SET status = $3, updated_at = NOW()
            WHERE id = $1 AND department = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(department)
        .bind(status.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    pub async fn set_flag(&self, id: Uuid, flag: bool) -> Result<Option<JoinedReport>, AppError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            "UPDATE reports SET flag = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(flag)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Final closing: replace the evidence with the resolution proof and mark
    /// the report resolved. Restricted to the official's own department.
    pub async fn close_with_resolution(
        &self,
        id: Uuid,
        department: &str,
        image_url: String,
        media_urls: Vec<String>,
    ) -> Result<Option<JoinedReport>, AppError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE reports
            SET image_url = $3, media_urls = $4, status = 'resolved', updated_at = NOW()
            WHERE id = $1 AND department = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(department)
        .bind(image_url)
        .bind(media_urls)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
