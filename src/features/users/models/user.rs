use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_CITIZEN, ROLE_MAYOR};

/// Account role, stored as lowercase text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Mayor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => ROLE_CITIZEN,
            UserRole::Mayor => ROLE_MAYOR,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CITIZEN => Ok(UserRole::Citizen),
            ROLE_MAYOR => Ok(UserRole::Mayor),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub region: String,
}

/// Data for creating a new user (password already hashed)
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub region: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("citizen".parse::<UserRole>(), Ok(UserRole::Citizen));
        assert_eq!("mayor".parse::<UserRole>(), Ok(UserRole::Mayor));
        assert!("Mayor".parse::<UserRole>().is_err());
        assert!("admin".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Mayor.to_string(), "mayor");
    }
}
