use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::services::session_service::{SessionService, StartedSession};
use crate::features::users::{User, UserRole, UserService};
use crate::shared::constants::DEFAULT_REGION;
use crate::shared::validation::USERNAME_REGEX;

/// Successful login: the account and its new session
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub session: StartedSession,
}

/// Service for authentication operations (register, login)
pub struct AuthService {
    users: Arc<UserService>,
    sessions: Arc<SessionService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, sessions: Arc<SessionService>) -> Self {
        Self { users, sessions }
    }

    /// Register a new account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<User> {
        let (username, password, role) = match (
            non_empty(dto.username.as_deref()),
            non_empty(dto.password.as_deref()),
            non_empty(dto.role.as_deref()),
        ) {
            (Some(u), Some(p), Some(r)) => (u, p, r),
            _ => return Err(AppError::BadRequest("Missing required fields".to_string())),
        };

        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if !USERNAME_REGEX.is_match(username) {
            return Err(AppError::Validation(
                "Username must start with a letter or underscore and contain only letters, digits, '_', '.' or '-'".to_string(),
            ));
        }

        let role = role
            .parse::<UserRole>()
            .map_err(|_| AppError::Validation("Role must be 'citizen' or 'mayor'".to_string()))?;

        let region = non_empty(dto.region.as_deref()).unwrap_or(DEFAULT_REGION);

        self.users.register(username, password, role, region).await
    }

    /// Check credentials and start a session
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginOutcome> {
        let (username, password) = match (
            non_empty(dto.username.as_deref()),
            non_empty(dto.password.as_deref()),
        ) {
            (Some(u), Some(p)) => (u, p),
            _ => return Err(AppError::BadRequest("Missing credentials".to_string())),
        };

        let user = self.users.authenticate(username, password).await?;
        let session = self.sessions.start(&user)?;

        tracing::info!("User logged in: {} (id: {})", user.username, user.id);

        Ok(LoginOutcome { user, session })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
