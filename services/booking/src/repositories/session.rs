//! Session repository for database operations
//!
//! Sessions are opaque bearer tokens issued at login. The protected routes
//! resolve the token back to a user here instead of trusting any requester
//! id supplied by the caller.

use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Session, User};

/// How long a session stays valid after login
const SESSION_TTL_HOURS: i64 = 24;

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user
    pub async fn create(&self, user_id: Uuid) -> AppResult<Session> {
        info!("Creating session for user: {}", user_id);

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Resolve a session token to its user, ignoring expired sessions
    pub async fn find_user_by_token(&self, token: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.password, u.role, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ?1 AND s.expires_at > ?2
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = User {
                    id: row.get("id"),
                    username: row.get("username"),
                    password: row.get("password"),
                    role: row.get("role"),
                    created_at: row.get("created_at"),
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Delete a session (logout)
    pub async fn delete(&self, token: Uuid) -> AppResult<()> {
        info!("Deleting session: {}", token);

        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
