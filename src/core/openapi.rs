use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::reports::models::ReportStatus;
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::users::UserRole;
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::current_user,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::resolve_report,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Auth
            UserRole,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::UserDto,
            auth::dtos::LoginResponseDto,
            auth::dtos::CurrentUserResponseDto,
            // Reports
            ReportStatus,
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportResponseDto,
            reports_dtos::SubmitReportForm,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "reports", description = "Hazard reports and their resolution"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Smart City Hazard API",
        version = "0.1.0",
        description = "Hazard reporting API for citizens and mayors",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie and bearer token security schemes to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
