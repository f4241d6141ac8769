use std::collections::HashSet;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::models::{slots, Appointment};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ── Reservation ledger ──

/// Grid cells occupied by a session starting at `time`: the slot itself plus
/// its catalog neighbors where they exist. A 60-minute session covers three
/// consecutive 30-minute cells.
fn session_block(time: &str) -> anyhow::Result<Vec<&'static str>> {
    let idx = slots::index_of(time)
        .ok_or_else(|| anyhow::anyhow!("time {time} is not in the slot catalog"))?;
    let catalog = slots::catalog();

    let mut block = Vec::with_capacity(3);
    if idx > 0 {
        block.push(catalog[idx - 1]);
    }
    block.push(catalog[idx]);
    if idx + 1 < catalog.len() {
        block.push(catalog[idx + 1]);
    }
    Ok(block)
}

pub fn reserve_slots(conn: &Connection, date: NaiveDate, time: &str) -> anyhow::Result<()> {
    let date_key = date.format(DATE_FMT).to_string();
    for slot in session_block(time)? {
        conn.execute(
            "INSERT OR IGNORE INTO reserved_slots (date, time) VALUES (?1, ?2)",
            params![date_key, slot],
        )?;
    }
    Ok(())
}

/// Removes the same triple `reserve_slots` added, by catalog position.
/// Deleting a slot that was never reserved is a no-op, so the operation is
/// idempotent.
pub fn release_slots(conn: &Connection, date: NaiveDate, time: &str) -> anyhow::Result<()> {
    let date_key = date.format(DATE_FMT).to_string();
    for slot in session_block(time)? {
        conn.execute(
            "DELETE FROM reserved_slots WHERE date = ?1 AND time = ?2",
            params![date_key, slot],
        )?;
    }
    Ok(())
}

pub fn reserved_times(conn: &Connection, date: NaiveDate) -> anyhow::Result<HashSet<String>> {
    let date_key = date.format(DATE_FMT).to_string();
    let mut stmt = conn.prepare("SELECT time FROM reserved_slots WHERE date = ?1")?;
    let rows = stmt.query_map(params![date_key], |row| row.get::<_, String>(0))?;

    let mut times = HashSet::new();
    for row in rows {
        times.insert(row?);
    }
    Ok(times)
}

// ── Appointments ──

pub fn insert_appointment(conn: &Connection, appointment: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, date, date_display, time, name, email, phone, reason, paid, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appointment.id,
            appointment.date.format(DATE_FMT).to_string(),
            appointment.date_display,
            appointment.time,
            appointment.name,
            appointment.email,
            appointment.phone,
            appointment.reason,
            appointment.paid as i32,
            appointment.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        "SELECT id, date, date_display, time, name, email, phone, reason, paid, created_at
         FROM appointments WHERE id = ?1",
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Removes the record and hands it back so the caller can release its
/// ledger entries. `None` when no record matches.
pub fn delete_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let Some(appointment) = get_appointment(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(Some(appointment))
}

/// Flips the payment flag, returning the new value, or `None` when no
/// record matches.
pub fn toggle_paid(conn: &Connection, id: &str) -> anyhow::Result<Option<bool>> {
    let count = conn.execute(
        "UPDATE appointments SET paid = 1 - paid WHERE id = ?1",
        params![id],
    )?;
    if count == 0 {
        return Ok(None);
    }

    let paid: i32 = conn.query_row(
        "SELECT paid FROM appointments WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(Some(paid != 0))
}

pub fn list_appointments(conn: &Connection) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, date_display, time, name, email, phone, reason, paid, created_at
         FROM appointments ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let date_str: String = row.get(1)?;
    let created_at_str: String = row.get(9)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .with_context(|| format!("bad date in appointments row: {date_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .with_context(|| format!("bad created_at in appointments row: {created_at_str}"))?;

    Ok(Appointment {
        id: row.get(0)?,
        date,
        date_display: row.get(2)?,
        time: row.get(3)?,
        name: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        reason: row.get(7)?,
        paid: row.get::<_, i32>(8)? != 0,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use uuid::Uuid;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn make_appointment(date: &str, time: &str, created_at: &str) -> Appointment {
        let date = d(date);
        Appointment {
            id: Uuid::new_v4().to_string(),
            date,
            date_display: date.format("%d/%m/%Y").to_string(),
            time: time.to_string(),
            name: "Ana García".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+34600111222".to_string(),
            reason: Some("primera consulta".to_string()),
            paid: false,
            created_at: dt(created_at),
        }
    }

    #[test]
    fn test_reserve_blocks_slot_and_neighbors() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "14:00").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        let expected: HashSet<String> = ["13:30", "14:00", "14:30"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(reserved, expected);
    }

    #[test]
    fn test_reserve_first_slot_has_no_predecessor() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "10:00").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        let expected: HashSet<String> =
            ["10:00", "10:30"].iter().map(|s| s.to_string()).collect();
        assert_eq!(reserved, expected);
    }

    #[test]
    fn test_reserve_last_slot_has_no_successor() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "20:30").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        let expected: HashSet<String> =
            ["20:00", "20:30"].iter().map(|s| s.to_string()).collect();
        assert_eq!(reserved, expected);
    }

    #[test]
    fn test_reserve_rejects_time_outside_catalog() {
        let conn = setup_db();
        assert!(reserve_slots(&conn, d("2024-06-10"), "09:00").is_err());
        assert!(reserve_slots(&conn, d("2024-06-10"), "14:15").is_err());
    }

    #[test]
    fn test_release_undoes_reserve() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "14:00").unwrap();
        release_slots(&conn, d("2024-06-10"), "14:00").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        assert!(reserved.is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "14:00").unwrap();
        release_slots(&conn, d("2024-06-10"), "14:00").unwrap();
        release_slots(&conn, d("2024-06-10"), "14:00").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        assert!(reserved.is_empty());
    }

    #[test]
    fn test_reserve_deduplicates_overlapping_blocks() {
        let conn = setup_db();
        // Blocks of 14:00 and 15:00 share 14:30; the shared cell must appear once.
        reserve_slots(&conn, d("2024-06-10"), "14:00").unwrap();
        reserve_slots(&conn, d("2024-06-10"), "15:00").unwrap();

        let reserved = reserved_times(&conn, d("2024-06-10")).unwrap();
        let expected: HashSet<String> = ["13:30", "14:00", "14:30", "15:00", "15:30"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(reserved, expected);
    }

    #[test]
    fn test_reservations_are_scoped_per_date() {
        let conn = setup_db();
        reserve_slots(&conn, d("2024-06-10"), "14:00").unwrap();

        let other_day = reserved_times(&conn, d("2024-06-11")).unwrap();
        assert!(other_day.is_empty());
    }

    #[test]
    fn test_insert_get_delete_appointment() {
        let conn = setup_db();
        let appointment = make_appointment("2024-06-10", "14:00", "2024-06-01 09:00");
        insert_appointment(&conn, &appointment).unwrap();

        let fetched = get_appointment(&conn, &appointment.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Ana García");
        assert_eq!(fetched.time, "14:00");
        assert!(!fetched.paid);

        let removed = delete_appointment(&conn, &appointment.id).unwrap().unwrap();
        assert_eq!(removed.id, appointment.id);
        assert!(get_appointment(&conn, &appointment.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_appointment_returns_none() {
        let conn = setup_db();
        assert!(delete_appointment(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let conn = setup_db();
        let appointment = make_appointment("2024-06-10", "14:00", "2024-06-01 09:00");
        insert_appointment(&conn, &appointment).unwrap();
        assert!(insert_appointment(&conn, &appointment).is_err());
    }

    #[test]
    fn test_toggle_paid_flips_and_reports() {
        let conn = setup_db();
        let appointment = make_appointment("2024-06-10", "14:00", "2024-06-01 09:00");
        insert_appointment(&conn, &appointment).unwrap();

        assert_eq!(toggle_paid(&conn, &appointment.id).unwrap(), Some(true));
        assert_eq!(toggle_paid(&conn, &appointment.id).unwrap(), Some(false));
        assert_eq!(toggle_paid(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn test_list_is_newest_first() {
        let conn = setup_db();
        let older = make_appointment("2024-06-10", "14:00", "2024-06-01 09:00");
        let newer = make_appointment("2024-06-11", "11:00", "2024-06-02 18:30");
        insert_appointment(&conn, &older).unwrap();
        insert_appointment(&conn, &newer).unwrap();

        let listed = list_appointments(&conn).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }
}
