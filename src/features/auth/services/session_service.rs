use axum::http::{header, HeaderMap, HeaderValue};
use std::sync::Arc;

use crate::core::config::SessionConfig;
use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::{User, UserService};
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::cookies::{build_cookie, expire_cookie, read_cookie};

/// A freshly started session
#[derive(Debug)]
pub struct StartedSession {
    pub token: String,
    pub cookie: HeaderValue,
}

/// Identity provider: turns request credentials into a principal
pub struct SessionService {
    tokens: TokenService,
    users: Arc<UserService>,
    cookie_secure: bool,
}

impl SessionService {
    pub fn new(config: &SessionConfig, users: Arc<UserService>) -> Self {
        Self {
            tokens: TokenService::new(config),
            users,
            cookie_secure: config.cookie_secure,
        }
    }

    pub fn start(&self, user: &User) -> Result<StartedSession> {
        let token = self.tokens.issue(user.id)?;
        let cookie = build_cookie(
            SESSION_COOKIE,
            &token,
            self.tokens.ttl().as_secs(),
            self.cookie_secure,
        );
        Ok(StartedSession { token, cookie })
    }

    pub fn end_cookie(&self) -> HeaderValue {
        expire_cookie(SESSION_COOKIE)
    }

    /// Bearer header wins over the session cookie
    pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| read_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()))
    }

    /// Resolve a token to the current account state.
    ///
    /// Returns `None` for invalid or expired tokens and for deleted accounts.
    pub async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>> {
        let user_id = match self.tokens.verify(token) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                return Ok(None);
            }
        };

        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .map(AuthenticatedUser::from))
    }
}
