use crate::shift::parse_digits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wall-clock time with minute resolution. No date, no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day '{0}' (expected HH:MM)")]
pub struct TimeOfDayError(pub String);

impl TimeOfDay {
    pub const NOON: TimeOfDay = TimeOfDay { hour: 12, minute: 0 };

    /// Returns `None` unless `hour` is 0-23 and `minute` is 0-59.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub(crate) const fn from_parts(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    /// Strict 24-hour `H:MM` / `HH:MM`. Free-text shift input goes through
    /// [`crate::shift::parse_shift`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || TimeOfDayError(s.to_string());
        let (h, m) = trimmed.split_once(':').ok_or_else(err)?;
        if h.is_empty() || m.len() != 2 {
            return Err(err());
        }
        let hour = parse_digits(h).ok_or_else(err)?;
        let minute = parse_digits(m).ok_or_else(err)?;
        Self::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_components() {
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(23, 60).is_none());
        assert_eq!(TimeOfDay::new(23, 59).unwrap().to_string(), "23:59");
    }

    #[test]
    fn orders_by_hour_then_minute() {
        let early = TimeOfDay::new(7, 45).unwrap();
        let late = TimeOfDay::new(8, 0).unwrap();
        assert!(early < late);
        assert_eq!(late.minutes_since_midnight(), 480);
    }

    #[test]
    fn strict_parse_and_serde_use_hh_mm() {
        let t: TimeOfDay = "7:05".parse().unwrap();
        assert_eq!(t, TimeOfDay::new(7, 5).unwrap());
        assert!("7:5".parse::<TimeOfDay>().is_err());
        assert!("7am".parse::<TimeOfDay>().is_err());
        assert!("+7:05".parse::<TimeOfDay>().is_err());
        assert!("7:+5".parse::<TimeOfDay>().is_err());

        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
