//! Resolution of the absolute recording-start instant.
//!
//! EDF's `startdate` field only carries a two-digit year, so the century is
//! pivoted at the format's 1985 inception. EDF+ recordings additionally
//! embed `Startdate dd-MMM-yyyy` in the recording-id field; when present,
//! that four-digit year wins.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::Header;
use crate::utils::parse_int;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Computes the UTC start instant from the header's date/time fields.
///
/// Header values are wall-clock UTC already; no timezone adjustment is
/// applied. Returns `None` when any needed subfield is malformed, matching
/// the header decoder's permissive policy.
pub fn start_instant(header: &Header) -> Option<DateTime<Utc>> {
    let (hour, minute, second) = three_numbers(&header.start_time)?;
    let (day, month, year) = recording_id_startdate(&header.recording_id)
        .or_else(|| pivoted_start_date(&header.start_date))?;
    Utc.with_ymd_and_hms(
        year,
        month,
        day,
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
    )
    .single()
}

/// Looks for the EDF+ `Startdate dd-MMM-yyyy` convention in the
/// recording-id field.
fn recording_id_startdate(recording_id: &str) -> Option<(u32, u32, i32)> {
    let mut tokens = recording_id.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "Startdate" {
            return parse_startdate(tokens.next()?);
        }
    }
    None
}

fn parse_startdate(token: &str) -> Option<(u32, u32, i32)> {
    let mut parts = token.split('-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if day.len() != 2 || year.len() != 4 || parts.next().is_some() {
        return None;
    }
    let month = MONTHS.iter().position(|&abbrev| abbrev == month)? as u32 + 1;
    Some((day.parse().ok()?, month, year.parse().ok()?))
}

/// Falls back on the `dd.mm.yy` start-date field, resolving the century:
/// years 85 and up belong to the 1900s, the rest to the 2000s.
fn pivoted_start_date(start_date: &str) -> Option<(u32, u32, i32)> {
    let (day, month, year) = three_numbers(start_date)?;
    let century = if year >= 85 { 1900 } else { 2000 };
    Some((
        u32::try_from(day).ok()?,
        u32::try_from(month).ok()?,
        i32::try_from(century + year).ok()?,
    ))
}

fn three_numbers(text: &str) -> Option<(i64, i64, i64)> {
    let mut parts = text.split('.');
    let first = parse_int(parts.next()?)?;
    let second = parse_int(parts.next()?)?;
    let third = parse_int(parts.next()?)?;
    Some((first, second, third))
}
