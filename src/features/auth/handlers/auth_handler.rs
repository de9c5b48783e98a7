use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    CurrentUserResponseDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto, UserDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{AuthService, SessionService};
use crate::shared::types::{ErrorResponse, MessageResponse};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// State for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub session_service: Arc<SessionService>,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.auth_service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Account created successfully")),
    ))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = LoginResponseDto),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<impl IntoResponse> {
    let outcome = state.auth_service.login(dto).await?;

    let body = LoginResponseDto {
        message: "Login successful".to_string(),
        user: AuthenticatedUser::from(outcome.user).into(),
        access_token: outcome.session.token,
        token_type: "Bearer".to_string(),
    };

    Ok((
        [(header::SET_COOKIE, outcome.session.cookie)],
        Json(body),
    ))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    tag = "auth",
    security(("session" = []), ("bearer_auth" = []))
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(state): State<AuthState>,
) -> impl IntoResponse {
    tracing::info!("User logged out: {} (id: {})", user.username, user.id);
    (
        [(header::SET_COOKIE, state.session_service.end_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Report whether the caller has a session, and who they are
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Session state", body = CurrentUserResponseDto)
    ),
    tag = "auth"
)]
pub async fn current_user(user: Option<AuthenticatedUser>) -> Json<CurrentUserResponseDto> {
    Json(CurrentUserResponseDto {
        is_authenticated: user.is_some(),
        user: user.map(UserDto::from),
    })
}
