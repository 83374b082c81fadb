//! Account store: users, roles, and their many-to-many membership.
//!
//! Membership is read through `AppUser::roles` (eagerly joined); callers
//! mutate that collection and re-save the user.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{AppRole, AppUser};

pub fn find_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<AppUser>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT user_id, username, email, password_hash
             FROM app_users WHERE username = ?1",
            params![username],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((user_id, username, email, password_hash)) = row else {
        return Ok(None);
    };

    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    let roles = fetch_roles(conn, &user_id)?;

    Ok(Some(AppUser {
        user_id,
        username,
        email,
        password_hash,
        roles,
    }))
}

/// Upsert by primary key. The role link rows are rewritten to mirror
/// `user.roles`; every listed role must already exist in `app_roles`.
pub fn save_user(conn: &Connection, user: &AppUser) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO app_users (user_id, username, email, password_hash)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             username = excluded.username,
             email = excluded.email,
             password_hash = excluded.password_hash",
        params![
            user.user_id.to_string(),
            user.username,
            user.email,
            user.password_hash,
        ],
    )?;

    conn.execute(
        "DELETE FROM user_roles WHERE user_id = ?1",
        params![user.user_id.to_string()],
    )?;
    for role in &user.roles {
        conn.execute(
            "INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?1, ?2)",
            params![user.user_id.to_string(), role],
        )?;
    }
    Ok(())
}

/// Upsert a role by name.
pub fn save_role(conn: &Connection, role: &AppRole) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO app_roles (role) VALUES (?1)",
        params![role.role],
    )?;
    Ok(())
}

pub fn role_exists(conn: &Connection, role: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM app_roles WHERE role = ?1",
        params![role],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn fetch_roles(conn: &Connection, user_id: &Uuid) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT role FROM user_roles WHERE user_id = ?1 ORDER BY role",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], |row| row.get(0))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn seed_roles(conn: &Connection) {
        save_role(conn, &AppRole::new("USER")).unwrap();
        save_role(conn, &AppRole::new("ADMIN")).unwrap();
    }

    #[test]
    fn missing_user_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(find_user_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn save_and_find_user_with_roles() {
        let conn = open_memory_database().unwrap();
        seed_roles(&conn);

        let mut user = AppUser::new("admin", "admin@gmail.com", "hash");
        user.roles = vec!["ADMIN".to_string(), "USER".to_string()];
        save_user(&conn, &user).unwrap();

        let fetched = find_user_by_username(&conn, "admin").unwrap().unwrap();
        assert_eq!(fetched.user_id, user.user_id);
        assert_eq!(fetched.roles, ["ADMIN", "USER"]);
    }

    #[test]
    fn save_user_is_upsert_by_primary_key() {
        let conn = open_memory_database().unwrap();
        seed_roles(&conn);

        let mut user = AppUser::new("user1", "user1@gmail.com", "hash-a");
        user.roles = vec!["USER".to_string()];
        save_user(&conn, &user).unwrap();

        user.email = "new@gmail.com".to_string();
        user.password_hash = "hash-b".to_string();
        user.roles.clear();
        save_user(&conn, &user).unwrap();

        let fetched = find_user_by_username(&conn, "user1").unwrap().unwrap();
        assert_eq!(fetched.email, "new@gmail.com");
        assert_eq!(fetched.password_hash, "hash-b");
        assert!(fetched.roles.is_empty());

        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM app_users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn username_uniqueness_is_enforced() {
        let conn = open_memory_database().unwrap();
        let first = AppUser::new("dup", "a@x.com", "hash");
        let second = AppUser::new("dup", "b@x.com", "hash");
        save_user(&conn, &first).unwrap();
        assert!(save_user(&conn, &second).is_err());
    }

    #[test]
    fn save_role_is_idempotent() {
        let conn = open_memory_database().unwrap();
        save_role(&conn, &AppRole::new("USER")).unwrap();
        save_role(&conn, &AppRole::new("USER")).unwrap();
        assert!(role_exists(&conn, "USER").unwrap());
        assert!(!role_exists(&conn, "ADMIN").unwrap());
    }

    #[test]
    fn duplicate_roles_on_user_collapse_to_one_row() {
        let conn = open_memory_database().unwrap();
        seed_roles(&conn);

        let mut user = AppUser::new("user2", "user2@gmail.com", "hash");
        user.roles = vec!["USER".to_string(), "USER".to_string()];
        save_user(&conn, &user).unwrap();

        let fetched = find_user_by_username(&conn, "user2").unwrap().unwrap();
        assert_eq!(fetched.roles, ["USER"]);
    }
}
