use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::{User, UserRole};

/// Principal attached to a request once its session has been resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub region: String,
}

impl AuthenticatedUser {
    pub fn is_mayor(&self) -> bool {
        self.role == UserRole::Mayor
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            region: user.region,
        }
    }
}
