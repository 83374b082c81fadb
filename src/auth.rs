//! Password hashing and the authentication adapter.
//!
//! The adapter is the single seam the login flow calls: it resolves a
//! username to a credentials view the authorization checks understand.
//! Roles are stored bare (`"ADMIN"`); this module prefixes them to the
//! `ROLE_ADMIN` authority form on read, and all authorization checks test
//! the prefixed form.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rusqlite::Connection;

use crate::accounts;

/// Authority granting mutation rights over patients.
pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Account(#[from] accounts::AccountError),
}

/// Credentials view handed to the login flow. Role names carry the
/// `ROLE_` prefix expected by the authorization checks.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Hash a password into a PHC string (PBKDF2-HMAC-SHA256, random salt).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let hash = Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. A malformed stored hash
/// counts as a failed verification, never a panic.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Map a stored bare role name to its prefixed authority form.
/// Already-prefixed names pass through unchanged.
pub fn role_authority(role: &str) -> String {
    if role.starts_with("ROLE_") {
        role.to_string()
    } else {
        format!("ROLE_{role}")
    }
}

/// Throwing lookup for the login flow. `UserNotFound` is surfaced to the
/// client as a generic failed-login signal, never with internal detail.
pub fn load_user_credentials(conn: &Connection, username: &str) -> Result<Credentials, AuthError> {
    let user = accounts::load_user_by_username(conn, username)?
        .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

    Ok(Credentials {
        username: user.username,
        password_hash: user.password_hash,
        roles: user.roles.iter().map(|r| role_authority(r)).collect(),
    })
}
