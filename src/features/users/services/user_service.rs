use sqlx::SqlitePool;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::password;
use crate::features::users::models::{NewUser, User, UserRole};

/// Credential store: persists accounts and checks passwords
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new account. Duplicate usernames fail with `Conflict`.
    pub async fn register(
        &self,
        username: &str,
        plain_password: &str,
        role: UserRole,
        region: &str,
    ) -> Result<User> {
        let new_user = NewUser {
            username: username.to_string(),
            password_hash: password::hash_password(plain_password)?,
            role,
            region: region.to_string(),
        };

        self.create(&new_user).await
    }

    async fn create(&self, data: &NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, region)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, username, password_hash, role, region
            "#,
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(&data.region)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict("Username already exists".to_string());
            }
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Registered user: {} (id: {}, role: {}, region: {})",
            user.username,
            user.id,
            user.role,
            user.region
        );

        Ok(user)
    }

    /// Check credentials. Unknown usernames and wrong passwords are indistinguishable.
    pub async fn authenticate(&self, username: &str, plain_password: &str) -> Result<User> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self.find_by_username(username).await?.ok_or_else(invalid)?;

        if !password::verify_password(plain_password, &user.password_hash)? {
            tracing::debug!("Password mismatch for user: {}", username);
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, region
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by id: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, region
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by username: {:?}", e);
            AppError::Database(e)
        })
    }

    #[cfg(test)]
    pub async fn count_by_username(&self, username: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    #[tokio::test]
    async fn test_register_then_authenticate_returns_stored_role_and_region() {
        let service = UserService::new(test_pool().await);

        service
            .register("chennai_mayor", "s3cret-pass", UserRole::Mayor, "Chennai")
            .await
            .unwrap();

        let user = service
            .authenticate("chennai_mayor", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(user.username, "chennai_mayor");
        assert_eq!(user.role, UserRole::Mayor);
        assert_eq!(user.region, "Chennai");
        assert_ne!(user.password_hash, "s3cret-pass");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts_without_second_row() {
        let service = UserService::new(test_pool().await);

        service
            .register("alice", "password1", UserRole::Citizen, "General")
            .await
            .unwrap();
        let err = service
            .register("alice", "password2", UserRole::Mayor, "Mumbai")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.count_by_username("alice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_password_and_unknown_user() {
        let service = UserService::new(test_pool().await);
        service
            .register("bob", "right-password", UserRole::Citizen, "General")
            .await
            .unwrap();

        let wrong = service.authenticate("bob", "wrong-password").await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

        let unknown = service.authenticate("nobody", "right-password").await;
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let service = UserService::new(test_pool().await);
        let created = service
            .register("carol", "password", UserRole::Citizen, "General")
            .await
            .unwrap();

        let found = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.username, "carol");
        assert!(service.find_by_id(created.id + 100).await.unwrap().is_none());
    }
}
