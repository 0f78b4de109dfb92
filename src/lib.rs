pub mod calendar;
pub mod config;
pub mod coverage;
pub mod export;
pub mod grid;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod month;
pub mod session;
pub mod shift;
pub mod store;
pub mod time_of_day;

pub use calendar::{CalendarError, WorkCalendar, WorkCalendarConfig};
pub use config::{ConfigError, SchedulerConfig};
pub use coverage::{CoverageCheck, CoverageRule, CoverageRules, Verdict, check_day, validate_day};
pub use export::{ExportError, ImportSummary, RejectedCell};
pub use month::{MonthParseError, YearMonth};
pub use session::{DayStatus, Session, SessionError};
pub use shift::{MalformedShift, ShiftParse, format_shift, parse_shift};
pub use store::{CellEdit, DaySchedule, RosterError, ScheduleStore, ShiftAssignment};
pub use time_of_day::TimeOfDay;
