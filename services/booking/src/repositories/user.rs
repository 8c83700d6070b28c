//! User repository for database operations
//!
//! This is the account directory: it owns the registration rules and the
//! authentication query.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::validation;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user
    ///
    /// Validation runs before any storage access, in a fixed order: empty
    /// fields, username character set, password uppercase, password special
    /// character, role, and finally username uniqueness. The `UNIQUE`
    /// constraint on `users.username` backs the uniqueness check, so a
    /// concurrent registration of the same name still resolves to a conflict.
    ///
    /// Passwords are stored verbatim; exact-match comparison is the
    /// authentication contract of the system this replaces.
    pub async fn register(&self, new_user: &NewUser) -> AppResult<User> {
        let role = validation::validate_registration(new_user).map_err(AppError::Validation)?;

        let existing = sqlx::query("SELECT id FROM users WHERE username = ?1")
            .bind(&new_user.username)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                new_user.username
            )));
        }

        info!("Registering new user: {}", new_user.username);

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            password: new_user.password.clone(),
            role,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(
                e,
                &format!("Username '{}' is already taken", new_user.username),
            )
        })?;

        Ok(user)
    }

    /// Authenticate a user by exact username and password match
    ///
    /// Returns `None` on any mismatch. A wrong password and an unknown
    /// username are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        info!("Authentication attempt for user: {}", username);

        let row = sqlx::query(
            r#"
            SELECT id, username, password, role, created_at
            FROM users
            WHERE username = ?1 AND password = ?2
            "#,
        )
        .bind(username)
        .bind(password)
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
}
