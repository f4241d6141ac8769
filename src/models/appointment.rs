use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One confirmed booking. Its (date, time) pair is always mirrored in the
/// reservation ledger while the record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub date: NaiveDate,
    pub date_display: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: Option<String>,
    pub paid: bool,
    pub created_at: NaiveDateTime,
}
