use chrono::NaiveDate;
use shift_coverage::{ExportError, Session, TimeOfDay};
use std::fs;
use tempfile::tempdir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_session() -> Session {
    let mut session = Session::new();
    session.add_person("Ana").unwrap();
    session.add_person("Ben").unwrap();
    session.edit_cell("Ana", d(2025, 7, 1), "7am-3pm").unwrap();
    session.edit_cell("Ben", d(2025, 7, 1), "11:00-18:00").unwrap();
    session.edit_cell("Ben", d(2025, 7, 31), "830-1700").unwrap();
    session
}

fn export_to_string(session: &Session) -> String {
    let mut buf = Vec::new();
    session.export_csv(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn csv_has_date_header_and_one_row_per_pharmacist() {
    let csv = export_to_string(&build_sample_session());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);

    let header: Vec<&str> = lines[0].split(',').collect();
    assert_eq!(header.len(), 24);
    assert_eq!(header[0], "");
    assert_eq!(header[1], "2025-07-01");
    assert_eq!(header[23], "2025-07-31");

    let ana: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(ana[0], "Ana");
    assert_eq!(ana[1], "07:00-15:00");
    assert!(ana[2..].iter().all(|cell| cell.is_empty()));

    let ben: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(ben[1], "11:00-18:00");
    assert_eq!(ben[23], "08:30-17:00");
}

#[test]
fn export_to_dir_uses_month_file_name() {
    let dir = tempdir().unwrap();
    let session = build_sample_session();
    let path = session.export_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "schedule_2025-07.csv");
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, export_to_string(&session));
}

#[test]
fn import_restores_an_exported_grid() {
    let original = build_sample_session();
    let csv = export_to_string(&original);

    let mut restored = Session::new();
    let summary = restored.import_csv(csv.as_bytes()).unwrap();
    assert_eq!(summary.people_added, 2);
    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.cleared, 2 * 23 - 3);
    assert!(summary.rejected.is_empty());
    assert_eq!(restored.store(), original.store());
}

#[test]
fn import_reports_bad_cells_and_keeps_old_values() {
    let mut session = build_sample_session();
    let csv = ",2025-07-01,2025-07-02\nAna,lunch only,7-15\nCleo,7am-7pm,\n";
    let summary = session.import_csv(csv.as_bytes()).unwrap();

    assert_eq!(summary.people_added, 1);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.cleared, 1);
    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.rejected[0].person, "Ana");
    assert_eq!(summary.rejected[0].input, "lunch only");

    let kept = session.store().assignment("Ana", d(2025, 7, 1)).unwrap();
    assert_eq!(kept.start, TimeOfDay::new(7, 0).unwrap());
    assert_eq!(session.store().people().len(), 3);
}

#[test]
fn import_rejects_non_date_headers() {
    let mut session = Session::new();
    let err = session
        .import_csv("name,Monday\nAna,7-15\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidData(_)));
}

#[test]
fn failed_import_leaves_the_store_untouched() {
    let mut session = Session::new();
    session.add_person("Carl").unwrap();
    session.edit_cell("Carl", d(2025, 7, 2), "9-17").unwrap();
    let before = session.store().clone();

    // second data row is short, so the reader fails after Ana's row
    let csv = ",2025-07-01,2025-07-02\nAna,7-15,7-15\nBen,8-16\n";
    let result = session.import_csv(csv.as_bytes());

    assert!(matches!(result, Err(ExportError::Csv(_))));
    assert_eq!(session.store(), &before);
    assert_eq!(session.store().people(), ["Carl".to_string()]);
    assert!(session.store().assignment("Ana", d(2025, 7, 1)).is_none());
}
