use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report, ReportStatus};

const REPORT_COLUMNS: &str = "id, user_id, image_path, annotated_path, hazard_type, latitude, \
     longitude, address, assigned_to, status, created_at";

/// Report repository
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a report with status `Pending`
    pub async fn create(&self, data: &NewReport) -> Result<Report> {
        let sql = format!(
            r#"
            INSERT INTO reports (
                user_id, image_path, annotated_path, hazard_type,
                latitude, longitude, address, assigned_to, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(data.user_id)
            .bind(&data.image_path)
            .bind(&data.annotated_path)
            .bind(&data.hazard_type)
            .bind(&data.latitude)
            .bind(&data.longitude)
            .bind(&data.address)
            .bind(&data.assigned_to)
            .bind(ReportStatus::Pending)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Created report: {} for user: {} ('{}', assigned to '{}')",
            report.id,
            report.user_id,
            report.hazard_type,
            report.assigned_to
        );

        Ok(report)
    }

    /// Reports submitted by a user, newest first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Report>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE user_id = ?1 ORDER BY id DESC",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports by user: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Reports whose address contains `region` (case-sensitive substring), newest first
    pub async fn list_by_region(&self, region: &str) -> Result<Vec<Report>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE instr(address, ?1) > 0 ORDER BY id DESC",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(region)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports by region: {:?}", e);
                AppError::Database(e)
            })
    }

    #[cfg(test)]
    pub async fn get_by_id(&self, id: i64) -> Result<Report> {
        let sql = format!("SELECT {} FROM reports WHERE id = ?1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
    }

    /// Mark a report resolved. Returns false when no report has this id.
    ///
    /// Re-resolving matches the row again and reports success.
    pub async fn resolve(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE reports SET status = ?1 WHERE id = ?2")
            .bind(ReportStatus::Resolved)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve report: {:?}", e);
                AppError::Database(e)
            })?;

        let matched = result.rows_affected() > 0;
        if matched {
            tracing::info!("Resolved report: {}", id);
        }
        Ok(matched)
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
