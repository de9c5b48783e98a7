use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::UserRole;

/// Registration payload (JSON body or HTML form).
///
/// Fields are optional so that absence maps to a 400 with a stable message
/// instead of a deserialization error.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: Option<String>,

    /// `citizen` or `mayor`
    pub role: Option<String>,

    /// Jurisdiction for mayors; defaults to `General`
    #[validate(length(max = 100, message = "Region must be at most 100 characters"))]
    pub region: Option<String>,
}

/// Login payload (JSON body or HTML form)
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub region: String,
}

impl From<AuthenticatedUser> for UserDto {
    fn from(u: AuthenticatedUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            region: u.region,
        }
    }
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub message: String,
    pub user: UserDto,
    /// Same token as the session cookie, for clients that send a bearer header
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
}

/// Response for `GET /api/user`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponseDto {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}
