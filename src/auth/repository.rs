// Database repository for identities and their roles

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{error::AuthError, models::User};

/// Identity lookup used by the credential verifier and the refresh flow
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an identity and its role names by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;
}

const SELECT_USER_WITH_ROLES: &str = r#"
    SELECT u.id, u.user_name, u.full_name, u.password_hash,
           u.account_non_expired, u.account_non_locked, u.credentials_non_expired, u.enabled,
           COALESCE(
               ARRAY_AGG(p.description::TEXT ORDER BY p.description)
                   FILTER (WHERE p.description IS NOT NULL),
               ARRAY[]::TEXT[]
           ) AS roles
    FROM users u
    LEFT JOIN user_permission up ON up.id_user = u.id
    LEFT JOIN permission p ON p.id = up.id_permission
    WHERE u.user_name = $1
    GROUP BY u.id
"#;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an enabled identity and grant it the named roles
    ///
    /// Role names without a matching permission row are ignored.
    pub async fn create_user(
        &self,
        username: &str,
        full_name: &str,
        password_hash: &str,
        roles: &[&str],
    ) -> Result<User, AuthError> {
        let mut tx = self.pool.begin().await?;

        let (user_id,): (i64,) = sqlx::query_as(
            "INSERT INTO users (user_name, full_name, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::UsernameTaken(username.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        let role_names: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        sqlx::query(
            "INSERT INTO user_permission (id_user, id_permission) \
             SELECT $1, id FROM permission WHERE description = ANY($2)",
        )
        .bind(user_id)
        .bind(&role_names)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }

    /// Check if a username is taken
    pub async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(SELECT_USER_WITH_ROLES)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}
