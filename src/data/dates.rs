//! Date normalisation for the heterogeneous date cells of the source sheet.
//!
//! A date cell is either text starting with `YYYY-MM-DD` or a spreadsheet
//! serial day count (days since 1899-12-30). Anything else, and anything that
//! does not land on a real calendar date, normalises to `None`.

use chrono::{NaiveDate, TimeDelta};

use super::model::CellValue;

/// Day zero of spreadsheet serial dates.
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Normalise a raw cell into a calendar date.
pub fn normalize(raw: &CellValue) -> Option<NaiveDate> {
    match raw {
        CellValue::Text(s) => parse_text(s),
        CellValue::Number(n) => from_serial(*n),
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}

/// Text cells: an ISO date prefix wins; otherwise numeric text is a serial.
pub fn parse_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(prefix) = iso_prefix(s) {
        return NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok();
    }
    s.parse::<f64>().ok().and_then(from_serial)
}

/// Convert a serial day count to a date. Any time-of-day fraction is dropped.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = TimeDelta::try_days(serial.floor() as i64)?;
    serial_epoch().checked_add_signed(days)
}

/// The leading `YYYY-MM-DD` slice of `s`, if it has that shape.
fn iso_prefix(s: &str) -> Option<&str> {
    let prefix = s.get(..10)?;
    let shaped = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped.then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn iso_strings() {
        assert_eq!(normalize(&"2021-03-15".into()), ymd(2021, 3, 15));
        assert_eq!(normalize(&"2021-03-15T10:30:00Z".into()), ymd(2021, 3, 15));
        assert_eq!(normalize(&" 2021-03-15 ".into()), ymd(2021, 3, 15));
    }

    #[test]
    fn invalid_iso_dates_do_not_fall_back_to_serials() {
        assert_eq!(normalize(&"2021-02-30".into()), None);
        assert_eq!(normalize(&"2021-13-01".into()), None);
    }

    #[test]
    fn serial_numbers() {
        assert_eq!(normalize(&CellValue::Number(44197.0)), ymd(2021, 1, 1));
        assert_eq!(normalize(&CellValue::Number(44197.75)), ymd(2021, 1, 1));
        assert_eq!(normalize(&CellValue::Number(1.0)), ymd(1899, 12, 31));
        assert_eq!(normalize(&"44197".into()), ymd(2021, 1, 1));
    }

    #[test]
    fn degenerate_serials() {
        assert_eq!(normalize(&CellValue::Number(0.0)), None);
        assert_eq!(normalize(&CellValue::Number(-5.0)), None);
        assert_eq!(normalize(&CellValue::Number(f64::NAN)), None);
        assert_eq!(normalize(&CellValue::Number(f64::INFINITY)), None);
        assert_eq!(normalize(&CellValue::Number(1e300)), None);
        assert_eq!(normalize(&CellValue::Number(1e12)), None);
    }

    #[test]
    fn other_cells() {
        assert_eq!(normalize(&CellValue::Empty), None);
        assert_eq!(normalize(&CellValue::Bool(true)), None);
        assert_eq!(normalize(&"15/03/2021".into()), None);
        assert_eq!(normalize(&"pendiente".into()), None);
        assert_eq!(normalize(&"".into()), None);
    }
}
