//! 📅 Ticket date parsing.
//!
//! Spreadsheets store dates in roughly as many formats as there are people who
//! have ever touched a spreadsheet. We accept the common ones and give up politely
//! on the rest: an unparseable date is `None`, and `None` never lands in a range.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

// -- 🕰️ naive datetimes are read as UTC. the spreadsheet did not tell us a timezone and we did not ask.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// -- 📏 serial 2958465 is 9999-12-31 in the 1900 date system. past that, it's not a date, it's a cry for help.
const MAX_SPREADSHEET_SERIAL: f64 = 2_958_465.0;

/// 🔬 Parse a raw ticket date into a UTC instant.
///
/// Tries RFC 3339 first, then a handful of naive datetime and date layouts,
/// then spreadsheet serial day numbers (days since 1899-12-30, fractional part
/// is time of day). Returns `None` when nothing fits.
pub fn parse_ticket_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }

    if let Some(day) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return day.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }

    parse_spreadsheet_serial(raw)
}

/// 🌙 Like [`parse_ticket_date`], but a bare calendar day means the last millisecond of it.
///
/// Meant for the inclusive end of a window: "through 2024-01-31" should still
/// catch the ticket filed at 09:00 that day. Anything with a time part is
/// taken as written.
pub fn parse_end_of_day(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
        .map(|last_tick| last_tick.and_utc())
        .or_else(|| parse_ticket_date(trimmed))
}

/// 🧮 Spreadsheet serial numbers: the date format that is secretly a float.
fn parse_spreadsheet_serial(raw: &str) -> Option<DateTime<Utc>> {
    let serial: f64 = raw.parse().ok()?;
    if !serial.is_finite() || !(1.0..=MAX_SPREADSHEET_SERIAL).contains(&serial) {
        return None;
    }
    // -- 🐛 1899-12-30, not 1900-01-01, thanks to a leap year bug from 1983 that we all still honor
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let offset = TimeDelta::try_milliseconds((serial * 86_400_000.0).round() as i64)?;
    epoch.checked_add_signed(offset).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn the_one_where_iso_dates_just_work() {
        let parsed = parse_ticket_date("2024-03-15").expect("💀 plain ISO date should parse");
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 15));
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn the_one_where_offsets_get_converted_to_utc() {
        let parsed = parse_ticket_date("2024-03-15T10:30:00+02:00").expect("💀 RFC 3339 should parse");
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn the_one_where_americans_export_the_spreadsheet() {
        let parsed = parse_ticket_date("03/15/2024").expect("💀 US-style date should parse");
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 15));

        let with_time = parse_ticket_date("2024-03-15 17:45:00").expect("💀 space-separated datetime");
        assert_eq!(with_time.hour(), 17);
    }

    #[test]
    fn the_one_where_the_date_is_secretly_a_float() {
        // -- 45366 is 2024-03-15 in the 1900 date system, .5 is noon
        let parsed = parse_ticket_date("45366.5").expect("💀 serial should parse");
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 15));
        assert_eq!(parsed.hour(), 12);
    }

    #[test]
    fn the_one_where_garbage_stays_garbage() {
        assert_eq!(parse_ticket_date(""), None);
        assert_eq!(parse_ticket_date("Invalid Date"), None);
        assert_eq!(parse_ticket_date("next tuesday-ish"), None);
        assert_eq!(parse_ticket_date("-5"), None);
        assert_eq!(parse_ticket_date("99999999"), None);
        assert_eq!(parse_ticket_date("2024-02-30"), None);
    }

    #[test]
    fn the_one_where_the_last_day_lasts_all_day() {
        let end = parse_end_of_day("2024-01-31").expect("💀 plain date should parse");
        assert_eq!((end.day(), end.hour(), end.minute(), end.second()), (31, 23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);

        let morning = parse_ticket_date("2024-01-31 09:00:00").expect("💀 morning ticket");
        assert!(morning <= end);
        assert!(parse_ticket_date("2024-02-01").expect("💀 next day") > end);

        // -- an explicit time is respected, not stretched
        let exact = parse_end_of_day("2024-01-31 09:00:00").expect("💀 datetime should parse");
        assert_eq!(exact, morning);
        assert_eq!(parse_end_of_day("01/31/2024"), Some(end));
        assert_eq!(parse_end_of_day("the heat death of the universe"), None);
    }
}
