use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::reports::models::{Report, ReportStatus};

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
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

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            image_path: r.image_path,
            annotated_path: r.annotated_path,
            hazard_type: r.hazard_type,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            assigned_to: r.assigned_to,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

/// Response DTO for a created report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReportResponseDto {
    pub message: String,
    pub report_id: i64,
}

/// Multipart form for report submission (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportForm {
    /// Photo of the hazard
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Latitude as text
    pub lat: String,
    /// Longitude as text
    pub lon: String,
}

/// Uploaded photo as received
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied filename; may be empty
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Raw report submission fields. Presence is checked by each surface.
#[derive(Debug, Default)]
pub struct ReportForm {
    pub file: Option<UploadedFile>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl ReportForm {
    /// Read `file`, `lat` and `lon` from a multipart body, ignoring other fields.
    ///
    /// A `file` field without a filename parameter is a plain form value, not an
    /// upload. Only empty coordinates count as missing.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ReportForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "file" => {
                    let Some(file_name) = field.file_name().map(str::to_string) else {
                        debug!("Ignoring non-file 'file' field");
                        continue;
                    };
                    let data = field.bytes().await.map_err(|e| {
                        debug!("Failed to read file bytes: {}", e);
                        AppError::BadRequest(format!("Failed to read file data: {}", e))
                    })?;
                    form.file = Some(UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    });
                }
                "lat" | "lon" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                    })?;
                    let value = Some(text).filter(|t| !t.is_empty());
                    if field_name == "lat" {
                        form.lat = value;
                    } else {
                        form.lon = value;
                    }
                }
                _ => {
                    debug!("Ignoring unknown field: {}", field_name);
                }
            }
        }

        Ok(form)
    }
}
