//! Account service — user/role provisioning on top of the account store.
//!
//! Composite operations (create user, assign/remove roles) with the
//! validation the store itself does not do: password confirmation,
//! duplicate-username guard, existence checks before membership changes.

use rusqlite::Connection;

use crate::auth;
use crate::db::repository::account;
use crate::db::DatabaseError;
use crate::models::{AppRole, AppUser};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Role not found: {0}")]
    RoleNotFound(String),
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Create a user with a hashed password. Fails when the confirmation does
/// not match or the username is already taken; nothing is written in
/// either case.
pub fn add_new_user(
    conn: &Connection,
    username: &str,
    password: &str,
    confirm_password: &str,
    email: &str,
) -> Result<AppUser, AccountError> {
    if password != confirm_password {
        return Err(AccountError::PasswordMismatch);
    }
    if account::find_user_by_username(conn, username)?.is_some() {
        return Err(AccountError::UsernameTaken(username.to_string()));
    }

    let hash = auth::hash_password(password).map_err(|e| AccountError::Hash(e.to_string()))?;
    let user = AppUser::new(username, email, hash);
    account::save_user(conn, &user)?;
    tracing::info!(username, "user created");
    Ok(user)
}

/// Idempotent upsert by role name.
pub fn add_new_role(conn: &Connection, role: &str) -> Result<AppRole, AccountError> {
    let role = AppRole::new(role);
    account::save_role(conn, &role)?;
    Ok(role)
}

/// Append a role to a user's membership. Idempotent: assigning a role the
/// user already holds changes nothing.
pub fn add_role_to_user(conn: &Connection, username: &str, role: &str) -> Result<(), AccountError> {
    let mut user = account::find_user_by_username(conn, username)?
        .ok_or_else(|| AccountError::UserNotFound(username.to_string()))?;
    if !account::role_exists(conn, role)? {
        return Err(AccountError::RoleNotFound(role.to_string()));
    }

    if !user.has_role(role) {
        user.roles.push(role.to_string());
        account::save_user(conn, &user)?;
        tracing::info!(username, role, "role assigned");
    }
    Ok(())
}

/// Remove a role from a user's membership; no-op when the user does not
/// hold it.
pub fn remove_role_from_user(
    conn: &Connection,
    username: &str,
    role: &str,
) -> Result<(), AccountError> {
    let mut user = account::find_user_by_username(conn, username)?
        .ok_or_else(|| AccountError::UserNotFound(username.to_string()))?;

    if user.has_role(role) {
        user.roles.retain(|r| r != role);
        account::save_user(conn, &user)?;
        tracing::info!(username, role, "role removed");
    }
    Ok(())
}

/// Non-throwing lookup, distinct from the authentication adapter's
/// throwing variant.
pub fn load_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<AppUser>, AccountError> {
    Ok(account::find_user_by_username(conn, username)?)
}
