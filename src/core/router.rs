use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, SessionService};
use crate::features::pages::{routes as pages_routes, PageState};
use crate::features::reports::{routes as reports_routes, ReportService, SubmissionService};
use crate::shared::templates::PageRenderer;

/// Services shared by the HTTP surfaces
pub struct AppServices {
    pub auth_service: Arc<AuthService>,
    pub session_service: Arc<SessionService>,
    pub report_service: Arc<ReportService>,
    pub submission_service: Arc<SubmissionService>,
    pub renderer: Arc<PageRenderer>,
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Assemble every route and the global middleware stack
pub fn build_router(config: &Config, services: AppServices) -> Router {
    // Build OpenAPI spec with config values
    let mut openapi = ApiDoc::openapi();
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let api_routes = Router::new()
        .merge(auth_routes::routes(
            Arc::clone(&services.auth_service),
            Arc::clone(&services.session_service),
        ))
        .merge(reports_routes::routes(
            Arc::clone(&services.report_service),
            Arc::clone(&services.submission_service),
        ));

    let page_routes = pages_routes::routes(PageState {
        auth_service: services.auth_service,
        session_service: Arc::clone(&services.session_service),
        report_service: services.report_service,
        submission_service: services.submission_service,
        renderer: services.renderer,
    });

    // Uploaded photos and annotated artifacts
    let static_files =
        Router::new().nest_service("/static", ServeDir::new(&config.app.static_dir));

    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(page_routes)
        .merge(static_files)
        .merge(health_route)
        // Principal is attached for every route; extractors decide what to require
        .layer(from_fn_with_state(
            services.session_service,
            middleware::session_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
