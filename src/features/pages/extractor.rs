use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};

use crate::features::auth::model::AuthenticatedUser;

/// Principal for HTML routes; anonymous visitors are sent to `/login`
pub struct PageUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for PageUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(PageUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}
