use crate::calendar::{CalendarError, WorkCalendar, WorkCalendarConfig};
use crate::config::SchedulerConfig;
use crate::coverage::{self, CoverageRule, CoverageRules, Verdict};
use crate::export::{self, ExportError, ImportSummary};
use crate::grid;
use crate::month::YearMonth;
use crate::store::{CellEdit, RosterError, ScheduleStore};
use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Coverage outcome for one date, ready to render as a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    /// Short label such as `Jul 03`.
    pub label: String,
    pub verdict: Verdict,
    pub failed: Vec<CoverageRule>,
}

impl DayStatus {
    pub fn status_text(&self) -> &'static str {
        self.verdict.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("month {month} is not selectable (choose one of: {choices})")]
    MonthNotSelectable { month: YearMonth, choices: String },
    #[error("no selectable months configured")]
    NoMonths,
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// One editor's working state: roster, shifts, and the month on screen.
#[derive(Debug, Clone)]
pub struct Session {
    store: ScheduleStore,
    months: Vec<YearMonth>,
    month: YearMonth,
    calendar: WorkCalendar,
    rules: CoverageRules,
}

impl Session {
    pub fn new() -> Self {
        // the default config always carries at least one month
        Self::from_config(&SchedulerConfig::default())
            .unwrap_or_else(|_| Self::with_parts(YearMonth::of(chrono::Local::now().date_naive())))
    }

    fn with_parts(month: YearMonth) -> Self {
        Self {
            store: ScheduleStore::new(),
            months: vec![month],
            month,
            calendar: WorkCalendar::default(),
            rules: CoverageRules::default(),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SessionError> {
        let mut months = config.months.clone();
        months.sort();
        months.dedup();
        let month = *months.first().ok_or(SessionError::NoMonths)?;
        Ok(Self {
            store: ScheduleStore::new(),
            months,
            month,
            calendar: WorkCalendar::from_config(&config.calendar)?,
            rules: config.rules,
        })
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn rules(&self) -> &CoverageRules {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: CoverageRules) {
        self.rules = rules;
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut WorkCalendar {
        &mut self.calendar
    }

    pub fn calendar_config(&self) -> WorkCalendarConfig {
        self.calendar.to_config()
    }

    pub fn set_calendar_from_config(&mut self, config: &WorkCalendarConfig) -> Result<(), SessionError> {
        self.calendar = WorkCalendar::from_config(config)?;
        Ok(())
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn select_month(&mut self, month: YearMonth) -> Result<(), SessionError> {
        if !self.months.contains(&month) {
            return Err(SessionError::MonthNotSelectable {
                month,
                choices: self
                    .months
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        self.month = month;
        info!(%month, "month selected");
        Ok(())
    }

    pub fn add_person(&mut self, name: &str) -> Result<String, RosterError> {
        self.store.add_person(name)
    }

    pub fn remove_person(&mut self, name: &str) -> Result<usize, RosterError> {
        self.store.remove_person(name)
    }

    pub fn edit_cell(&mut self, person: &str, date: NaiveDate, raw: &str) -> Result<CellEdit, RosterError> {
        self.store.edit_cell(person, date, raw)
    }

    /// Roster dates of the selected month.
    pub fn month_dates(&self) -> Vec<NaiveDate> {
        self.calendar.days_in_month(self.month)
    }

    pub fn day_status(&self, date: NaiveDate) -> DayStatus {
        let day = self.store.day_schedule(date);
        let check = coverage::check_day(day.intervals(), &self.rules);
        DayStatus {
            date,
            label: date.format("%b %d").to_string(),
            verdict: check.verdict,
            failed: check.failed,
        }
    }

    /// Revalidate every date of the selected month.
    pub fn coverage(&self) -> Vec<DayStatus> {
        self.month_dates()
            .into_iter()
            .map(|date| self.day_status(date))
            .collect()
    }

    pub fn grid(&self) -> PolarsResult<DataFrame> {
        grid::month_grid(&self.store, &self.month_dates())
    }

    pub fn status_frame(&self) -> PolarsResult<DataFrame> {
        grid::status_frame(&self.coverage())
    }

    pub fn export_file_name(&self) -> String {
        self.month.export_file_name()
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        export::write_month_csv(&self.store, &self.month_dates(), writer)
    }

    /// Write `schedule_<month>.csv` into `dir` and return its path.
    pub fn export_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(self.export_file_name());
        export::save_month_csv(&self.store, &self.month_dates(), &path)?;
        Ok(path)
    }

    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportSummary, ExportError> {
        export::read_month_csv(&mut self.store, reader)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
