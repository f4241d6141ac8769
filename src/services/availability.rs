use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::slots::{self, DayType};

/// Offerable times for `date`, in catalog order. An empty result means the
/// day is closed, fully booked, or already over; it is not an error.
///
/// Zero-padded `HH:MM` strings compare correctly as strings, so no time
/// parsing is needed here.
pub fn available_slots(
    date: NaiveDate,
    reserved: &HashSet<String>,
    now: NaiveDateTime,
) -> Vec<&'static str> {
    let day_type = slots::day_type(date);
    if day_type == DayType::Closed {
        return vec![];
    }

    let cutoff = if date == now.date() {
        Some(now.format("%H:%M").to_string())
    } else {
        None
    };

    slots::catalog()
        .iter()
        .copied()
        .filter(|time| {
            // Saturdays run mornings only: 10:00 up to but excluding 13:00.
            if day_type == DayType::Saturday {
                let hour: u32 = time[..2].parse().unwrap_or(0);
                if !(10..13).contains(&hour) {
                    return false;
                }
            }
            if reserved.contains(*time) {
                return false;
            }
            // Same-day bookings must be strictly in the future.
            if let Some(cutoff) = &cutoff {
                if *time <= cutoff.as_str() {
                    return false;
                }
            }
            true
        })
        .collect()
}
