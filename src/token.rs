//! Refresh-token persistence.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{Result, StorageError};

pub const TOKEN_LENGTH: u64 = 64;
const TOKEN_TTL_DAYS: i64 = 15;

/// Renewal credential as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    #[serde(skip)]
    pub id: i64,
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshToken {
    /// Issue a new 15-day token to `user_id`.
    pub fn issue(user_id: impl Into<String>) -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let now = Utc::now();

        Self {
            id: i64::default(),
            token: hex::encode(bytes),
            user_id: user_id.into(),
            created_at: now,
            expires_at: now + Duration::days(TOKEN_TTL_DAYS),
            revoked: false,
        }
    }

    /// Whether the token still renews a session.
    pub fn is_active(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now()
    }
}

/// Handle database requests for [`RefreshToken`] records.
///
/// Every operation borrows its own pooled connection for its own duration;
/// nothing is shared across calls and no locking is added.
#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: PgPool,
}

impl RefreshTokenStore {
    /// Create a new [`RefreshTokenStore`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new record.
    ///
    /// No uniqueness check on the token value: the row is written as given
    /// and the write fails only if the store rejects it.
    pub async fn save(&self, token: &RefreshToken) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO refresh_tokens (token, user_id, created_at, expires_at, revoked)
                VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.created_at)
        .bind(token.expires_at)
        .bind(token.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Return the first record matching `token`, if any.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"SELECT id, token, user_id, created_at, expires_at, revoked
                FROM refresh_tokens
                WHERE token = $1
                ORDER BY id
                LIMIT 1"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Overwrite the fields of an existing record, keyed by `id`.
    ///
    /// Rotation rewrites the token value in place rather than inserting a
    /// second row.
    pub async fn update(&self, token: &RefreshToken) -> Result<()> {
        let result = sqlx::query(
            r#"UPDATE refresh_tokens
                SET token = $1, user_id = $2, expires_at = $3, revoked = $4
                WHERE id = $5"#,
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(token.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingRow { id: token.id });
        }

        Ok(())
    }
}
