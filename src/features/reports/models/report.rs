use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Report status, stored as `Pending` / `Resolved`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
pub enum ReportStatus {
    Pending,
    Resolved,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "Pending"),
            ReportStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub image_path: String,
    pub annotated_path: String,
    pub hazard_type: String,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub assigned_to: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new report; status always starts as `Pending`
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: i64,
    pub image_path: String,
    pub annotated_path: String,
    pub hazard_type: String,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub assigned_to: String,
}
