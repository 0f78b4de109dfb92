use crate::grid;
use crate::store::{CellEdit, RosterError, ScheduleStore};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// A cell that could not be read back during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedCell {
    pub person: String,
    pub date: NaiveDate,
    pub input: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub people_added: usize,
    pub accepted: usize,
    pub cleared: usize,
    pub rejected: Vec<RejectedCell>,
}

/// Header row is an empty corner cell followed by the ISO dates; every other
/// row is a pharmacist followed by their `HH:MM-HH:MM` cells.
pub fn write_month_csv<W: Write>(
    store: &ScheduleStore,
    dates: &[NaiveDate],
    writer: W,
) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(dates.len() + 1);
    header.push(String::new());
    header.extend(dates.iter().map(|d| grid::date_column_name(*d)));
    writer.write_record(&header)?;

    for person in store.people() {
        let mut record = Vec::with_capacity(dates.len() + 1);
        record.push(person.clone());
        for date in dates {
            record.push(
                store
                    .assignment(person, *date)
                    .map(|a| a.cell_text())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_month_csv<P: AsRef<Path>>(
    store: &ScheduleStore,
    dates: &[NaiveDate],
    path: P,
) -> ExportResult<()> {
    let file = File::create(path.as_ref())?;
    write_month_csv(store, dates, file)?;
    info!(path = %path.as_ref().display(), days = dates.len(), "schedule exported");
    Ok(())
}

/// Feed an exported (and possibly hand-edited) grid back through the cell
/// parser. Unknown pharmacists are added to the roster. Edits land on a copy
/// of the store, which replaces the original only once the whole file reads
/// cleanly; on error `store` is untouched.
pub fn read_month_csv<R: Read>(store: &mut ScheduleStore, reader: R) -> ExportResult<ImportSummary> {
    let mut staged = store.clone();
    let summary = apply_month_csv(&mut staged, reader)?;
    *store = staged;
    info!(
        accepted = summary.accepted,
        cleared = summary.cleared,
        rejected = summary.rejected.len(),
        "schedule imported"
    );
    Ok(summary)
}

fn apply_month_csv<R: Read>(store: &mut ScheduleStore, reader: R) -> ExportResult<ImportSummary> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let dates = reader
        .headers()?
        .iter()
        .skip(1)
        .map(|header| {
            NaiveDate::parse_from_str(header.trim(), "%Y-%m-%d").map_err(|e| {
                ExportError::InvalidData(format!("invalid date column '{header}': {e}"))
            })
        })
        .collect::<ExportResult<Vec<_>>>()?;

    let mut summary = ImportSummary::default();
    for record in reader.records() {
        let record = record?;
        let Some(person) = record.get(0).map(str::trim).filter(|p| !p.is_empty()) else {
            continue;
        };
        if !store.contains_person(person) {
            store.add_person(person)?;
            summary.people_added += 1;
        }

        for (date, raw) in dates.iter().zip(record.iter().skip(1)) {
            match store.edit_cell(person, *date, raw)? {
                CellEdit::Accepted(_) => summary.accepted += 1,
                CellEdit::Cleared => summary.cleared += 1,
                CellEdit::Rejected(reason) => summary.rejected.push(RejectedCell {
                    person: person.to_string(),
                    date: *date,
                    input: raw.to_string(),
                    reason: reason.to_string(),
                }),
            }
        }
    }

    Ok(summary)
}
