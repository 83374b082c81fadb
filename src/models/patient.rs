use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A patient record. `id` is assigned by the store on first save and
/// immutable afterwards; `None` marks a record not yet persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Option<i64>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub is_sick: bool,
    pub score: i32,
}

impl Patient {
    /// Build an unpersisted patient with all required fields.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate, is_sick: bool, score: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            is_sick,
            score,
        }
    }
}
