/// Postgres-backed user store
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{NewUser, User, UserChanges};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique-constraint violation onto the matching conflict error.
fn map_insert_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return match db_err.constraint() {
                Some(constraint) if constraint.contains("email") => AuthError::EmailTaken,
                _ => AuthError::UsernameTaken,
            };
        }
    }
    AuthError::Database(err.to_string())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE verification_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, verification_token,
                               is_active, is_verified, created_at, updated_at)
            VALUES (gen_random_uuid(), $1, $2, $3, $4, true, false,
                    CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.verification_token)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                is_verified = COALESCE($4, is_verified),
                full_name = COALESCE($5, full_name),
                phone_number = COALESCE($6, phone_number),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(changes.is_verified)
        .bind(&changes.full_name)
        .bind(&changes.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }
}
