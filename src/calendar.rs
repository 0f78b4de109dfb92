use crate::month::YearMonth;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Decides which dates of a month appear in the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    #[serde(default)]
    holidays: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar requires at least one working day")]
    NoWorkingDays,
}

/// Monday to Friday, no holidays.
impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn custom<I, J>(working_days: I, holidays: J) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = WorkCalendarConfig::new(working_days, holidays)?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &WorkCalendarConfig) -> Result<Self, CalendarError> {
        let working_set: HashSet<Weekday> = config.working_days.iter().copied().collect();
        if working_set.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        let non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working_set.contains(day))
            .collect();

        Ok(Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
        })
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    /// Add the US federal holidays observed on their calendar date for `year`.
    pub fn add_us_holidays(&mut self, year: i32) {
        let fixed = [(1, 1), (7, 4), (11, 11), (12, 25)];
        for (month, day) in fixed {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }

        let floating = [
            // Martin Luther King Jr. Day, Presidents' Day
            Self::nth_weekday(year, 1, Weekday::Mon, 3),
            Self::nth_weekday(year, 2, Weekday::Mon, 3),
            // Memorial Day
            Self::last_weekday(year, 5, Weekday::Mon),
            // Labor Day, Columbus Day, Thanksgiving
            Self::nth_weekday(year, 9, Weekday::Mon, 1),
            Self::nth_weekday(year, 10, Weekday::Mon, 2),
            Self::nth_weekday(year, 11, Weekday::Thu, 4),
        ];
        self.holidays.extend(floating.into_iter().flatten());
    }

    fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, n as u8)
    }

    fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
        let month = YearMonth::new(year, month)?;
        let mut date = month.last_day();
        while date.weekday() != weekday {
            date = date - Duration::days(1);
        }
        Some(date)
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn remove_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays.remove(&date)
    }

    pub fn set_working_days(&mut self, days: &[Weekday]) -> Result<(), CalendarError> {
        if days.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        self.non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !days.contains(day))
            .collect();
        Ok(())
    }

    /// Toggle a single weekday, e.g. open on Saturdays.
    pub fn set_weekday_working(&mut self, day: Weekday, working: bool) -> Result<(), CalendarError> {
        if working {
            self.non_working_days.remove(&day);
            return Ok(());
        }
        if self.non_working_days.len() + 1 >= Self::ALL_WEEKDAYS.len()
            && !self.non_working_days.contains(&day)
        {
            return Err(CalendarError::NoWorkingDays);
        }
        self.non_working_days.insert(day);
        Ok(())
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    pub fn available_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_available(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }

    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.available_days_in_range(start, end).len()
    }

    /// Working days of `month`, in order. Only dates inside the month.
    pub fn days_in_month(&self, month: YearMonth) -> Vec<NaiveDate> {
        self.available_days_in_range(month.first_day(), month.last_day())
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        if working.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Ok(Self {
            working_days: working,
            holidays,
        })
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day))
            .collect();

        let mut holidays: Vec<NaiveDate> = calendar.holidays.iter().copied().collect();
        holidays.sort();

        Self {
            working_days: working,
            holidays,
        }
    }
}
