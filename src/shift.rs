//! Free-text shift parsing.
//!
//! A cell holds something like `"7am-3pm"`, `"07:30 - 12:30"`, `"830-1700"` or
//! nothing at all. [`parse_shift`] turns it into a [`ShiftParse`] without ever
//! failing: blank input is [`ShiftParse::Empty`], anything unreadable is
//! [`ShiftParse::Malformed`] with a reason the caller can show.

use crate::time_of_day::TimeOfDay;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftParse {
    /// Blank cell, or the literal `nan` left behind by spreadsheet exports.
    Empty,
    Malformed(MalformedShift),
    /// Start and end in the order written; `start > end` is not rejected here.
    Parsed(TimeOfDay, TimeOfDay),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedShift {
    #[error("expected '<start>-<end>' but found {0} part(s)")]
    WrongPartCount(usize),
    #[error("'{0}' is not a clock time")]
    NotATime(String),
    #[error("'{0}' is outside 00:00-23:59")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl ShiftParse {
    pub fn pair(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match self {
            ShiftParse::Parsed(start, end) => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ShiftParse::Empty)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ShiftParse::Malformed(_))
    }
}

/// Parse one cell. Case and whitespace are ignored everywhere in the input.
pub fn parse_shift(raw: &str) -> ShiftParse {
    let normalized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if normalized.is_empty() || normalized == "nan" {
        return ShiftParse::Empty;
    }

    let parts: Vec<&str> = normalized.split('-').collect();
    if parts.len() != 2 {
        return ShiftParse::Malformed(MalformedShift::WrongPartCount(parts.len()));
    }

    let start = match parse_clock(parts[0]) {
        Ok(time) => time,
        Err(reason) => return ShiftParse::Malformed(reason),
    };
    let end = match parse_clock(parts[1]) {
        Ok(time) => time,
        Err(reason) => return ShiftParse::Malformed(reason),
    };
    ShiftParse::Parsed(start, end)
}

/// Parse a single normalized clock token such as `8`, `830`, `8:30`, `3:30pm`.
pub fn parse_clock(token: &str) -> Result<TimeOfDay, MalformedShift> {
    let not_a_time = || MalformedShift::NotATime(token.to_string());

    let (body, meridiem) = if let Some(body) = token.strip_suffix("pm") {
        (body, Some(Meridiem::Pm))
    } else if let Some(body) = token.strip_suffix("am") {
        (body, Some(Meridiem::Am))
    } else {
        (token, None)
    };

    // split_at below works on bytes
    if body.is_empty() || !body.is_ascii() {
        return Err(not_a_time());
    }

    let (hour_str, minute_str) = if let Some((hour, minute)) = body.split_once(':') {
        (hour, minute)
    } else if body.len() <= 2 {
        (body, "0")
    } else {
        body.split_at(body.len() - 2)
    };

    let mut hour = parse_digits(hour_str).ok_or_else(not_a_time)?;
    let minute = parse_digits(minute_str).ok_or_else(not_a_time)?;

    match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        _ => {}
    }

    TimeOfDay::new(hour, minute).ok_or_else(|| MalformedShift::OutOfRange(token.to_string()))
}

/// ASCII digits only, no sign. Runs too long for `u32` saturate so the caller
/// reports them as out of range.
pub(crate) fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse::<u32>().unwrap_or(u32::MAX))
}

/// Canonical cell text, `HH:MM-HH:MM`.
pub fn format_shift(start: TimeOfDay, end: TimeOfDay) -> String {
    format!("{start}-{end}")
}
