//! Tabular views of a month: the editable person × date grid and the coverage
//! strip, both as polars frames, plus a plain-text renderer for the terminal.

use crate::session::DayStatus;
use crate::store::ScheduleStore;
use chrono::NaiveDate;
use polars::prelude::*;

pub const PERSON_COLUMN: &str = "pharmacist";

pub fn date_column_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One row per pharmacist in roster order, one column per date. Cells hold
/// `HH:MM-HH:MM` or an empty string.
pub fn month_grid(store: &ScheduleStore, dates: &[NaiveDate]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dates.len() + 1);
    let people: Vec<&str> = store.people().iter().map(String::as_str).collect();
    columns.push(Series::new(PlSmallStr::from_static(PERSON_COLUMN), people).into_column());

    for date in dates {
        let cells: Vec<String> = store
            .people()
            .iter()
            .map(|person| {
                store
                    .assignment(person, *date)
                    .map(|a| a.cell_text())
                    .unwrap_or_default()
            })
            .collect();
        columns.push(Series::new(PlSmallStr::from(date_column_name(*date)), cells).into_column());
    }

    DataFrame::new(columns)
}

/// `Date | Status | Missing` rows, one per day.
pub fn status_frame(statuses: &[DayStatus]) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = statuses.iter().map(|s| s.label.clone()).collect();
    let labels: Vec<&str> = statuses.iter().map(|s| s.verdict.label()).collect();
    let missing: Vec<String> = statuses
        .iter()
        .map(|s| {
            s.failed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("Date"), dates).into_column(),
        Series::new(PlSmallStr::from_static("Status"), labels).into_column(),
        Series::new(PlSmallStr::from_static("Missing"), missing).into_column(),
    ])
}

fn cell_to_string(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.get(row_idx)
                    .map(|av| cell_to_string(&av))
                    .unwrap_or_default()
            })
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, cells: &[String]| {
        out.push('|');
        for (ci, cell) in cells.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_person_column_and_one_column_per_date() {
        let mut store = ScheduleStore::new();
        store.add_person("Ana").unwrap();
        store.add_person("Ben").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        store.edit_cell("Ana", day, "7am-3pm").unwrap();

        let df = month_grid(&store, &[day]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let col = df.column("2025-07-01").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("07:00-15:00"));
        assert_eq!(col.get(1), Some(""));

        let text = render_text_table(&df);
        assert!(text.contains("| pharmacist | 2025-07-01  |"));
        assert!(text.contains("| Ana        | 07:00-15:00 |"));
    }
}
