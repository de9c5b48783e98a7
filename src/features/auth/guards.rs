//! Role-based authorization guards.
//!
//! Guards read the principal placed in request extensions by the session
//! middleware. A missing principal is `401`; a principal with the wrong role is `403`.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for mayor-only JSON endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireMayor(user): RequireMayor) { ... }
/// ```
pub struct RequireMayor(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMayor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !user.is_mayor() {
            return Err(AppError::Forbidden("Access Denied".to_string()));
        }

        Ok(RequireMayor(user.clone()))
    }
}
