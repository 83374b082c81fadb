//! Patient store: CRUD plus the keyword-paginated listing query.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::Patient;

/// One page of the patient listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientPage {
    pub items: Vec<Patient>,
    pub total_pages: u32,
}

/// Fetch one page of patients whose name contains `keyword` as an exact
/// (case-sensitive) substring. An empty keyword matches every patient.
/// Pages are 0-indexed and ordered by id.
///
/// `instr()` is used instead of `LIKE` so SQLite's default ASCII case
/// folding does not apply, and so `%`/`_` in the keyword stay literal.
pub fn find_page(
    conn: &Connection,
    keyword: &str,
    page: u32,
    size: u32,
) -> Result<PatientPage, DatabaseError> {
    if size == 0 {
        return Err(DatabaseError::ConstraintViolation(
            "page size must be positive".to_string(),
        ));
    }

    let match_count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE ?1 = '' OR instr(name, ?1) > 0",
        params![keyword],
        |row| row.get(0),
    )?;
    let total_pages = match_count.div_ceil(size);

    // Widened before multiplying: a large page number must fall off the
    // end of the result set, not overflow u32.
    let offset = i64::from(page) * i64::from(size);
    let mut stmt = conn.prepare(
        "SELECT id, name, birth_date, is_sick, score
         FROM patients
         WHERE ?1 = '' OR instr(name, ?1) > 0
         ORDER BY id
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt.query_map(params![keyword, size, offset], patient_from_row)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(PatientPage { items, total_pages })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT id, name, birth_date, is_sick, score FROM patients WHERE id = ?1",
            params![id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

/// Insert when `id` is `None`, full overwrite when `Some`. Returns the
/// persisted patient with its id populated. Updating an unknown id
/// signals `NotFound`.
pub fn save(conn: &Connection, patient: &Patient) -> Result<Patient, DatabaseError> {
    let mut saved = patient.clone();
    match patient.id {
        None => {
            conn.execute(
                "INSERT INTO patients (name, birth_date, is_sick, score)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    patient.name,
                    patient.birth_date,
                    patient.is_sick as i32,
                    patient.score,
                ],
            )?;
            saved.id = Some(conn.last_insert_rowid());
        }
        Some(id) => {
            let changed = conn.execute(
                "UPDATE patients SET name = ?1, birth_date = ?2, is_sick = ?3, score = ?4
                 WHERE id = ?5",
                params![
                    patient.name,
                    patient.birth_date,
                    patient.is_sick as i32,
                    patient.score,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(DatabaseError::NotFound {
                    entity_type: "Patient".to_string(),
                    id: id.to_string(),
                });
            }
        }
    }
    Ok(saved)
}

/// Delete by id. Silently succeeds when the id is absent — the listing
/// workflow treats delete as a fire-and-forget step before redirecting.
pub fn delete_by_id(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn count(conn: &Connection) -> Result<u32, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

fn patient_from_row(row: &rusqlite::Row<'_>) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        birth_date: row.get(2)?,
        is_sick: row.get::<_, i32>(3)? != 0,
        score: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::NaiveDate;

    fn birth(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 6, 1).unwrap()
    }

    fn seed_demo(conn: &Connection) {
        for (name, score) in [("Mohammed", 334), ("Hanane", 4321), ("Imane", 344)] {
            save(conn, &Patient::new(name, birth(1990), false, score)).unwrap();
        }
    }

    #[test]
    fn save_assigns_id_and_roundtrips() {
        let conn = open_memory_database().unwrap();
        let saved = save(&conn, &Patient::new("Mohammed", birth(1988), true, 334)).unwrap();
        let id = saved.id.expect("insert populates id");

        let fetched = find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.birth_date, birth(1988));
        assert!(fetched.is_sick);
    }

    #[test]
    fn save_with_id_overwrites_all_fields() {
        let conn = open_memory_database().unwrap();
        let mut saved = save(&conn, &Patient::new("Imane", birth(2001), false, 344)).unwrap();

        saved.name = "Imane B".to_string();
        saved.is_sick = true;
        saved.score = 999;
        save(&conn, &saved).unwrap();

        let fetched = find_by_id(&conn, saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.name, "Imane B");
        assert!(fetched.is_sick);
        assert_eq!(fetched.score, 999);
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn save_with_unknown_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        let mut ghost = Patient::new("Ghost", birth(1970), false, 0);
        ghost.id = Some(9999);
        let err = save(&conn, &ghost).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn find_page_respects_size_and_total_pages() {
        let conn = open_memory_database().unwrap();
        for i in 0..7 {
            save(&conn, &Patient::new(format!("patient{i}"), birth(1990), false, i)).unwrap();
        }

        let page = find_page(&conn, "", 0, 4).unwrap();
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.total_pages, 2); // ceil(7 / 4)

        let last = find_page(&conn, "", 1, 4).unwrap();
        assert_eq!(last.items.len(), 3);
        assert_eq!(last.total_pages, 2);

        let beyond = find_page(&conn, "", 2, 4).unwrap();
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn find_page_empty_keyword_matches_all() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        let page = find_page(&conn, "", 0, 10).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn find_page_filters_by_substring() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);

        let page = find_page(&conn, "an", 0, 4).unwrap();
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Hanane", "Imane"]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn find_page_substring_match_is_case_sensitive() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);

        assert!(find_page(&conn, "han", 0, 4).unwrap().items.is_empty());
        assert_eq!(find_page(&conn, "Han", 0, 4).unwrap().items.len(), 1);
    }

    #[test]
    fn find_page_keyword_wildcards_are_literal() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        assert!(find_page(&conn, "%", 0, 4).unwrap().items.is_empty());
        assert!(find_page(&conn, "_", 0, 4).unwrap().items.is_empty());
    }

    #[test]
    fn find_page_no_match_has_zero_pages() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        let page = find_page(&conn, "zzz", 0, 4).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn find_page_far_beyond_last_page_is_empty() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        // page * size exceeds u32::MAX; must not overflow, just run off
        // the end of the result set.
        let page = find_page(&conn, "", 1_500_000_000, 4).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn find_page_rejects_zero_size() {
        let conn = open_memory_database().unwrap();
        let err = find_page(&conn, "", 0, 0).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn deleted_patient_disappears_from_page_and_lookup() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        let target = find_page(&conn, "Hanane", 0, 4).unwrap().items[0].clone();
        let id = target.id.unwrap();

        delete_by_id(&conn, id).unwrap();

        assert!(find_by_id(&conn, id).unwrap().is_none());
        let page = find_page(&conn, "", 0, 10).unwrap();
        assert!(page.items.iter().all(|p| p.id != Some(id)));
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn delete_unknown_id_is_silent() {
        let conn = open_memory_database().unwrap();
        seed_demo(&conn);
        delete_by_id(&conn, 42_000).unwrap();
        assert_eq!(count(&conn).unwrap(), 3);
    }
}
