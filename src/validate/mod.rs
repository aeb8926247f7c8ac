//! Input validators for roster and training records
//!
//! Pure acceptance rules shared by the services and the CSV import
//! engine: ID-card structure, the half-hour time grid, and duration
//! derivation.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::SENTINEL_ID_CARD;

/// Validate an 18-character national ID
///
/// The sentinel value is always accepted. Structure only: 6-digit region
/// code, 19xx/20xx birth year, month 01-12, day 01-31 (no month-length
/// check), 3 sequence digits, trailing digit or `X`. The check digit is
/// not verified.
pub fn validate_id_card(value: &str) -> bool {
    if value == SENTINEL_ID_CARD {
        return true;
    }

    static ID_CARD_RE: OnceLock<Regex> = OnceLock::new();
    let re = ID_CARD_RE.get_or_init(|| {
        Regex::new(r"^[1-9]\d{5}(19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}(\d|X)$")
            .expect("Invalid regex pattern")
    });

    re.is_match(value)
}

/// Mask an ID card for display: first 6 + `******` + last 4
///
/// The sentinel and anything that is not exactly 18 characters pass
/// through unchanged.
pub fn mask_id_card(value: &str) -> String {
    if value == SENTINEL_ID_CARD {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 18 {
        return value.to_string();
    }

    let prefix: String = chars[..6].iter().collect();
    let suffix: String = chars[14..].iter().collect();
    format!("{prefix}******{suffix}")
}

/// Whether a time string is one of the 48 half-hour grid values
pub fn validate_time_format(value: &str) -> bool {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    let re = TIME_RE
        .get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):(00|30)$").expect("Invalid regex pattern"));

    re.is_match(value)
}

/// The ordered half-hour grid: `00:00`, `00:30`, ... `23:30`
pub fn time_slots() -> Vec<String> {
    let mut slots = Vec::with_capacity(48);
    for hour in 0..24 {
        slots.push(format!("{hour:02}:00"));
        slots.push(format!("{hour:02}:30"));
    }
    slots
}

/// Minutes from `start` to `end` on one nominal day
///
/// `None` when either input is not a parseable `HH:MM` time, when `end`
/// is not strictly after `start`, or when the difference is not a
/// multiple of 30. Only the forward direction ever yields a value.
pub fn calculate_duration(start: &str, end: &str) -> Option<u32> {
    let start_min = minutes_of_day(start)?;
    let end_min = minutes_of_day(end)?;
    if end_min <= start_min {
        return None;
    }

    let duration = end_min - start_min;
    if duration % 30 != 0 {
        return None;
    }
    Some(duration)
}

fn minutes_of_day(value: &str) -> Option<u32> {
    let (hour, minute) = value.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour >= 24 || minute >= 60 {
        return None;
    }
    Some(hour * 60 + minute)
}
