use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireMayor;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportResponseDto, ReportForm, ReportResponseDto, SubmitReportForm,
};
use crate::features::reports::services::{ReportService, SubmissionService};
use crate::shared::types::{ErrorResponse, MessageResponse};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub submission_service: Arc<SubmissionService>,
}

/// List reports visible to the caller
///
/// Mayors see every report whose address mentions their region; citizens see
/// their own submissions.
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Reports, newest first", body = Vec<ReportResponseDto>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("session" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
) -> Result<Json<Vec<ReportResponseDto>>> {
    let reports = if user.is_mayor() {
        state.report_service.list_by_region(&user.region).await?
    } else {
        state.report_service.list_by_user(user.id).await?
    };

    Ok(Json(reports.into_iter().map(ReportResponseDto::from).collect()))
}

/// Submit a hazard report with a photo and coordinates
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content = SubmitReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report created", body = CreateReportResponseDto),
        (status = 400, description = "Missing file or location", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("session" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreateReportResponseDto>)> {
    let form = match multipart {
        Ok(multipart) => ReportForm::from_multipart(multipart).await?,
        Err(rejection) => {
            tracing::debug!("Report submission is not multipart: {}", rejection);
            ReportForm::default()
        }
    };

    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file part".to_string()))?;
    if file.file_name.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    let (Some(lat), Some(lon)) = (form.lat, form.lon) else {
        return Err(AppError::BadRequest("Missing location data".to_string()));
    };

    let report = state
        .submission_service
        .submit(user.id, &file.file_name, &file.data, &lat, &lon)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponseDto {
            message: "Report created".to_string(),
            report_id: report.id,
        }),
    ))
}

/// Mark a report resolved (mayor only)
#[utoipa::path(
    put,
    path = "/api/resolve/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report resolved", body = MessageResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Access Denied", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("session" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn resolve_report(
    RequireMayor(user): RequireMayor,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.report_service.resolve(id).await? {
        return Err(AppError::NotFound("Report not found".to_string()));
    }

    tracing::info!("Report {} resolved by {}", id, user.username);
    Ok(Json(MessageResponse::new("Report resolved")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;

    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::{test_png_bytes, StubDetector, StubGeocoder, TestApp};

    fn photo_form(file_name: &str, lat: &str, lon: &str) -> MultipartForm {
        MultipartForm::new()
            .add_part(
                "file",
                Part::bytes(test_png_bytes())
                    .file_name(file_name)
                    .mime_type("image/png"),
            )
            .add_text("lat", lat)
            .add_text("lon", lon)
    }

    async fn chennai_app() -> TestApp {
        TestApp::new(
            StubDetector::labels(&["pothole"]),
            StubGeocoder::returning("Anna Salai, Chennai, Tamil Nadu, India", "Chennai"),
        )
        .await
    }

    #[tokio::test]
    async fn test_submit_and_list_own_reports() {
        let app = chennai_app().await;
        let token = app.register_and_login("asha", "citizen", "").await;

        let response = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(photo_form("road.png", "13.0827", "80.2707"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Report created");
        let report_id = body["report_id"].as_i64().unwrap();

        assert!(app.upload_dir().join("road.png").exists());
        assert!(app.upload_dir().join("detected_road.png").exists());

        let reports: Vec<Value> = app
            .server
            .get("/api/reports")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["id"], report_id);
        assert_eq!(reports[0]["hazard_type"], "pothole");
        assert_eq!(reports[0]["assigned_to"], "Chennai Mayor");
        assert_eq!(reports[0]["status"], "Pending");
        assert_eq!(reports[0]["image_path"], "static/uploads/road.png");
        assert_eq!(reports[0]["annotated_path"], "static/uploads/detected_road.png");

        // The annotated artifact is served from the stored path
        app.server
            .get("/static/uploads/detected_road.png")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_submission_validation_messages() {
        let app = chennai_app().await;
        let token = app.register_and_login("asha", "citizen", "").await;

        let no_file = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(MultipartForm::new().add_text("lat", "1").add_text("lon", "2"))
            .await;
        no_file.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(no_file.json::<Value>()["error"], "No file part");

        let text_file = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(
                MultipartForm::new()
                    .add_text("file", "road.png")
                    .add_text("lat", "1")
                    .add_text("lon", "2"),
            )
            .await;
        text_file.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(text_file.json::<Value>()["error"], "No file part");

        let unnamed = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(
                MultipartForm::new()
                    .add_part("file", Part::bytes(test_png_bytes()).file_name(""))
                    .add_text("lat", "1")
                    .add_text("lon", "2"),
            )
            .await;
        unnamed.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(unnamed.json::<Value>()["error"], "No selected file");

        let no_location = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(photo_form("road.png", "13.0827", ""))
            .await;
        no_location.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(no_location.json::<Value>()["error"], "Missing location data");

        let too_long = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(photo_form(&format!("{}.png", "a".repeat(250)), "1", "2"))
            .await;
        too_long.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(too_long.json::<Value>()["error"], "File name is too long");

        assert_eq!(app.reports.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_coordinates_are_kept_verbatim() {
        let app = chennai_app().await;
        let token = app.register_and_login("asha", "citizen", "").await;

        let response = app
            .server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(photo_form("road.png", " ", " "))
            .await;
        response.assert_status(StatusCode::CREATED);

        let reports: Vec<Value> = app
            .server
            .get("/api/reports")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(reports[0]["latitude"], " ");
        assert_eq!(reports[0]["longitude"], " ");
    }

    #[tokio::test]
    async fn test_reports_require_a_session() {
        let app = chennai_app().await;

        let response = app.server.get("/api/reports").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "Authentication required");

        let garbage = app
            .server
            .get("/api/reports")
            .authorization_bearer("not-a-token")
            .await;
        garbage.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_mayor_lists_reports_for_region() {
        let app = chennai_app().await;
        let citizen = app.register_and_login("asha", "citizen", "").await;
        let chennai_mayor = app.register_and_login("priya", "mayor", "Chennai").await;
        let mumbai_mayor = app.register_and_login("rahul", "mayor", "Mumbai").await;

        app.server
            .post("/api/reports")
            .authorization_bearer(&citizen)
            .multipart(photo_form("a.png", "13.08", "80.27"))
            .await
            .assert_status(StatusCode::CREATED);

        let visible: Vec<Value> = app
            .server
            .get("/api/reports")
            .authorization_bearer(&chennai_mayor)
            .await
            .json();
        assert_eq!(visible.len(), 1);

        let elsewhere: Vec<Value> = app
            .server
            .get("/api/reports")
            .authorization_bearer(&mumbai_mayor)
            .await
            .json();
        assert!(elsewhere.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_is_mayor_only_and_idempotent() {
        let app = chennai_app().await;
        let citizen = app.register_and_login("asha", "citizen", "").await;
        let mayor = app.register_and_login("priya", "mayor", "Chennai").await;

        let created: Value = app
            .server
            .post("/api/reports")
            .authorization_bearer(&citizen)
            .multipart(photo_form("a.png", "13.08", "80.27"))
            .await
            .json();
        let id = created["report_id"].as_i64().unwrap();

        let denied = app
            .server
            .put(&format!("/api/resolve/{}", id))
            .authorization_bearer(&citizen)
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(denied.json::<Value>()["error"], "Access Denied");
        assert_eq!(
            app.reports.get_by_id(id).await.unwrap().status,
            ReportStatus::Pending
        );

        let missing = app
            .server
            .put(&format!("/api/resolve/{}", id + 100))
            .authorization_bearer(&mayor)
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<Value>()["error"], "Report not found");

        for _ in 0..2 {
            let resolved = app
                .server
                .post(&format!("/api/resolve/{}", id))
                .authorization_bearer(&mayor)
                .await;
            resolved.assert_status_ok();
            assert_eq!(resolved.json::<Value>()["message"], "Report resolved");
        }
        assert_eq!(
            app.reports.get_by_id(id).await.unwrap().status,
            ReportStatus::Resolved
        );
    }

    #[tokio::test]
    async fn test_detector_and_geocoder_outage_still_creates_report() {
        let app = TestApp::new(StubDetector::failing(), StubGeocoder::failing()).await;
        let token = app.register_and_login("asha", "citizen", "").await;

        app.server
            .post("/api/reports")
            .authorization_bearer(&token)
            .multipart(photo_form("x.png", "0", "0"))
            .await
            .assert_status(StatusCode::CREATED);

        let reports: Vec<Value> = app
            .server
            .get("/api/reports")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(reports[0]["hazard_type"], "Unknown Hazard");
        assert_eq!(reports[0]["address"], "GPS Location Found (Address Unavailable)");
        assert_eq!(reports[0]["assigned_to"], "General Mayor");
    }
}
