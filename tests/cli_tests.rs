#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::tempdir;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("SHIFT_COVERAGE_CONFIG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_rejects_duplicate_pharmacist() {
    run_cli("add Ana\nadd Ana\nquit\n")
        .success()
        .stdout(str_contains("Added pharmacist Ana."))
        .stdout(str_contains("pharmacist 'Ana' is already on the roster"));
}

#[test]
fn cli_set_normalizes_and_status_turns_green() {
    run_cli("add Ana\nadd Ben\nset Ana 1 7:30am - 12:30pm\nset Ben 2025-07-01 11-18\nstatus\nquit\n")
        .success()
        .stdout(str_contains("Ana 2025-07-01: 07:30-12:30"))
        .stdout(str_contains("Ben 2025-07-01: 11:00-18:00"))
        .stdout(str_contains("| Jul 01 | OK      |"))
        .stdout(str_contains("| Jul 02 | MISSING | opener,closer,midday |"));
}

#[test]
fn cli_keeps_previous_value_on_bad_input() {
    run_cli("add Ana\nset Ana 1 7-15\nset Ana 1 8-5-3\nshow\nquit\n")
        .success()
        .stdout(str_contains("Rejected '8-5-3'"))
        .stdout(str_contains("previous value kept"))
        .stdout(str_contains("07:00-15:00"));
}

#[test]
fn cli_parse_command_explains_input() {
    run_cli("parse 3:30pm-11:15pm\nparse nan\nparse abc\nquit\n")
        .success()
        .stdout(str_contains("15:30-23:15"))
        .stdout(str_contains("empty"))
        .stdout(str_contains("malformed:"));
}

#[test]
fn cli_export_writes_month_file() {
    let dir = tempdir().expect("create temp dir");
    let script = format!(
        "month 2025-08\nadd Ana\nset Ana 2025-08-01 7am-6pm\nexport {}\nquit\n",
        dir.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("schedule_2025-08.csv"));
    let written = std::fs::read_to_string(dir.path().join("schedule_2025-08.csv")).unwrap();
    assert!(written.contains("Ana,07:00-18:00"));
}

#[test]
fn cli_set_and_clear_accept_names_with_spaces() {
    run_cli("add Mary Jane\nset Mary Jane 2025-07-01 7-18\nclear Mary Jane 2\nshow\nquit\n")
        .success()
        .stdout(str_contains("Added pharmacist Mary Jane."))
        .stdout(str_contains("Mary Jane 2025-07-01: 07:00-18:00"))
        .stdout(str_contains("Mary Jane 2025-07-02: cleared"))
        .stdout(str_contains("| Mary Jane  | 07:00-18:00 |"));
}

#[test]
fn cli_rules_set_changes_the_verdict() {
    run_cli("add Ana\nset Ana 1 8-18\nrules set 08:00 17:00 12:00\nstatus\nrules set 8am\nquit\n")
        .success()
        .stdout(str_contains("Opener by          : 08:00"))
        .stdout(str_contains("| Jul 01 | OK      |"))
        .stdout(str_contains("Error: invalid time of day '8am'"));
}
