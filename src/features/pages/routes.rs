use axum::{routing::get, Router};

use crate::features::pages::handlers::{self, PageState};

/// Server-rendered HTML routes
pub fn routes(state: PageState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route("/logout", get(handlers::logout))
        .route(
            "/dashboard",
            get(handlers::dashboard).post(handlers::dashboard_submit),
        )
        .route("/admin", get(handlers::admin))
        .route("/resolve/{id}", get(handlers::resolve))
        .with_state(state)
}
