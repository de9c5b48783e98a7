use crate::features::auth::handlers::{self, AuthState};
use crate::features::auth::services::{AuthService, SessionService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// JSON auth routes. `/api/logout` enforces a session through its extractor.
pub fn routes(auth_service: Arc<AuthService>, session_service: Arc<SessionService>) -> Router {
    let state = AuthState {
        auth_service,
        session_service,
    };

    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/user", get(handlers::current_user))
        .with_state(state)
}
