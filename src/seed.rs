//! Idempotent startup seed.
//!
//! Runs once at boot, guarded by existence checks: the demo roles and
//! accounts are created only when missing, and the demo patients only
//! when the patient table is empty. Safe to run on every start.

use rusqlite::Connection;

use crate::accounts::{self, AccountError};
use crate::config;
use crate::db::repository::patient;
use crate::db::DatabaseError;
use crate::models::Patient;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub fn run_seed(conn: &Connection) -> Result<(), SeedError> {
    accounts::add_new_role(conn, config::USER_ROLE)?;
    accounts::add_new_role(conn, config::ADMIN_ROLE)?;

    seed_user(conn, "user1", "1234", "user1@gmail.com", &[config::USER_ROLE])?;
    seed_user(conn, "user2", "1234", "user2@gmail.com", &[config::USER_ROLE])?;
    seed_user(
        conn,
        "admin",
        "1234",
        "admin@gmail.com",
        &[config::USER_ROLE, config::ADMIN_ROLE],
    )?;

    seed_patients(conn)?;
    Ok(())
}

fn seed_user(
    conn: &Connection,
    username: &str,
    password: &str,
    email: &str,
    roles: &[&str],
) -> Result<(), SeedError> {
    if accounts::load_user_by_username(conn, username)?.is_some() {
        return Ok(());
    }

    accounts::add_new_user(conn, username, password, password, email)?;
    for role in roles {
        accounts::add_role_to_user(conn, username, role)?;
    }
    tracing::info!(username, ?roles, "seeded account");
    Ok(())
}

fn seed_patients(conn: &Connection) -> Result<(), SeedError> {
    if patient::count(conn)? > 0 {
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    for (name, score) in [("Mohammed", 334), ("Hanane", 4321), ("Imane", 344)] {
        patient::save(conn, &Patient::new(name, today, false, score))?;
    }
    tracing::info!("seeded demo patients");
    Ok(())
}
