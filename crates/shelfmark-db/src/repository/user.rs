//! # User Repository
//!
//! Account storage and credential verification.
//!
//! ## Credential Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Login Flow                                           │
//! │                                                                         │
//! │  verify_credentials("admin", "secret")                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT password_hash FROM users WHERE username = ?                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  argon2::verify_password(candidate, stored PHC hash)                    │
//! │       │                                                                 │
//! │       ├── ok   → Ok(User)   (role drives what the UI offers)            │
//! │       └── fail → Err(NotFound)  (same error as unknown username,        │
//! │                                  so probing can't tell them apart)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The previous system compared usernames against literals compiled into
//! the binary. Here every account is a row, every password is an argon2
//! PHC hash, and no plaintext survives past the hashing call.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use shelfmark_core::{Role, User};

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account with a freshly hashed password.
    ///
    /// ## Errors
    /// - [`DbError::UniqueViolation`] if the username is taken
    /// - [`DbError::Credential`] if hashing fails (never for valid input)
    pub async fn create(&self, username: &str, password: &str, role: Role) -> DbResult<User> {
        let password_hash = hash_password(password)?;
        let now = Utc::now();

        debug!(username = %username, role = %role, "Creating user account");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash, role, created_at) \
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(role.to_string())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash,
            role,
            created_at: now,
        })
    }

    /// Looks up an account by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verifies a username/password pair and returns the account on success.
    ///
    /// Unknown username and wrong password both report [`DbError::NotFound`]
    /// for "user"; callers present it as a single "invalid credentials"
    /// message.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> DbResult<User> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| DbError::not_found("user", username))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| DbError::Credential(format!("stored hash is invalid: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!(username = %username, "Password verification failed");
            return Err(DbError::not_found("user", username));
        }

        debug!(username = %username, role = %user.role, "Credentials verified");
        Ok(user)
    }

    /// Replaces an account's password with a fresh hash.
    pub async fn set_password(&self, username: &str, new_password: &str) -> DbResult<()> {
        let password_hash = hash_password(new_password)?;

        let result = sqlx::query("UPDATE users SET password_hash = ?2 WHERE username = ?1")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", username));
        }

        Ok(())
    }

    /// Returns the number of accounts. Zero means first-run setup is needed.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Hashes a password into an argon2 PHC string with a random salt.
fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Credential(e.to_string()))?;
    Ok(hash.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
