use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// An account allowed to mint bearer tokens.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>(
            "SELECT id, email, password_hash, password_salt, created_at FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Insert a new user. Returns `None` when the email is already taken.
    pub async fn create(
        email: &str,
        password_hash: &str,
        password_salt: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, email, password_hash, password_salt)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, password_salt, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(password_salt)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
