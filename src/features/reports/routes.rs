use std::sync::Arc;

use axum::{routing::get, routing::put, Router};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{ReportService, SubmissionService};

/// Create routes for the reports feature
///
/// Authentication is enforced per handler through the principal extractors
pub fn routes(
    report_service: Arc<ReportService>,
    submission_service: Arc<SubmissionService>,
) -> Router {
    let state = ReportState {
        report_service,
        submission_service,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/resolve/{id}",
            put(handlers::resolve_report).post(handlers::resolve_report),
        )
        .with_state(state)
}
