use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// The bookable half-hour grid, 10:00 through 20:30. The order is
/// significant: reserving a slot also blocks its immediate neighbors in
/// this sequence.
pub const SLOT_CATALOG: [&str; 22] = [
    "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30",
    "15:00", "15:30", "16:00", "16:30", "17:00", "17:30", "18:00", "18:30", "19:00", "19:30",
    "20:00", "20:30",
];

pub fn catalog() -> &'static [&'static str] {
    &SLOT_CATALOG
}

pub fn index_of(time: &str) -> Option<usize> {
    SLOT_CATALOG.iter().position(|t| *t == time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Saturday,
    Closed,
}

/// Sundays are closed; Saturdays run a reduced morning schedule.
pub fn day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sun => DayType::Closed,
        Weekday::Sat => DayType::Saturday,
        _ => DayType::Weekday,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_catalog_shape() {
        assert_eq!(catalog().len(), 22);
        assert_eq!(catalog()[0], "10:00");
        assert_eq!(catalog()[21], "20:30");
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("10:00"), Some(0));
        assert_eq!(index_of("14:00"), Some(8));
        assert_eq!(index_of("20:30"), Some(21));
        assert_eq!(index_of("09:30"), None);
        assert_eq!(index_of("21:00"), None);
        assert_eq!(index_of("14:15"), None);
    }

    #[test]
    fn test_day_type() {
        // 2024-06-09 is a Sunday, 2024-06-08 a Saturday, 2024-06-10 a Monday
        assert_eq!(day_type(d("2024-06-09")), DayType::Closed);
        assert_eq!(day_type(d("2024-06-08")), DayType::Saturday);
        assert_eq!(day_type(d("2024-06-10")), DayType::Weekday);
        assert_eq!(day_type(d("2024-06-14")), DayType::Weekday);
    }
}
