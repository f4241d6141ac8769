use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Appointment;
use crate::services::availability;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: Option<String>,
}

/// Confirms a booking: validates the requested time against the current
/// availability, then writes the appointment record and the ledger triple in
/// one transaction. Either both land or neither does.
pub fn book_appointment(
    conn: &mut Connection,
    request: &BookingRequest,
    now: NaiveDateTime,
) -> Result<Appointment, AppError> {
    let date = parse_date(&request.date)?;

    let reserved = queries::reserved_times(conn, date)?;
    let offerable = availability::available_slots(date, &reserved, now);
    if !offerable.iter().any(|t| *t == request.time) {
        return Err(AppError::SlotUnavailable(format!(
            "{} {} is not offerable",
            request.date, request.time
        )));
    }

    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        date,
        date_display: date.format("%d/%m/%Y").to_string(),
        time: request.time.clone(),
        name: request.name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        reason: request.reason.clone(),
        paid: false,
        created_at: now,
    };

    let tx = conn.transaction()?;
    queries::insert_appointment(&tx, &appointment)?;
    queries::reserve_slots(&tx, date, &appointment.time)?;
    tx.commit()?;

    tracing::info!(
        "booked appointment {} for {} at {}",
        appointment.id,
        appointment.date,
        appointment.time
    );

    Ok(appointment)
}

/// Deletes the record and releases its ledger triple in one transaction,
/// returning the removed record.
pub fn cancel_appointment(conn: &mut Connection, id: &str) -> Result<Appointment, AppError> {
    let tx = conn.transaction()?;
    let appointment = queries::delete_appointment(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
    queries::release_slots(&tx, appointment.date, &appointment.time)?;
    tx.commit()?;

    tracing::info!(
        "cancelled appointment {} for {} at {}",
        appointment.id,
        appointment.date,
        appointment.time
    );

    Ok(appointment)
}

/// Flips the payment flag, returning the new value.
pub fn toggle_paid(conn: &Connection, id: &str) -> Result<bool, AppError> {
    queries::toggle_paid(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))
}

/// All active records, newest first. The canonical admin read.
pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, AppError> {
    Ok(queries::list_appointments(conn)?)
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid date: {s}")))
}
