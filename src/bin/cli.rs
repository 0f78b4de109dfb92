use chrono::{NaiveDate, Weekday};
use shift_coverage::grid::render_text_table;
use shift_coverage::{
    CellEdit, CoverageRules, SchedulerConfig, Session, ShiftParse, TimeOfDay, WorkCalendarConfig,
    YearMonth, logging, parse_shift,
};
use std::fs;
use std::io::{self, Write};

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the shift grid for the selected month\n  status                             Show OK/MISSING coverage per day\n  months                             List selectable months\n  month <YYYY-MM>                    Select a month\n  add <name...>                      Add a pharmacist\n  remove <name...>                   Remove a pharmacist and their shifts\n  set <name...> <date|day> <shift...> Enter a shift, e.g. set Ana 2025-07-01 7am-3pm\n  clear <name...> <date|day>         Clear a cell\n  parse <text...>                    Show how a shift entry is read\n  export [dir]                       Write schedule_<month>.csv (default: current dir)\n  import <path>                      Read an edited CSV grid back in\n  rules show                         Show coverage thresholds\n  rules set <opener> <closer> <midday> Set thresholds as HH:MM, e.g. rules set 07:45 17:00 12:00\n  calendar show                      Display working days and holidays\n  calendar saturday <on|off>         Include or exclude Saturdays\n  calendar holiday <YYYY-MM-DD>      Mark a date closed\n  calendar us-holidays <year>        Mark US federal holidays closed\n  calendar set <json_path>           Load calendar config from JSON file\n  calendar save <json_path>          Save current calendar config to JSON file\n  quit|exit                          Exit"
    );
}

fn print_grid(session: &Session) {
    println!("Month: {}", session.month());
    match session.grid() {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error building grid: {}", e),
    }
}

fn print_status(session: &Session) {
    match session.status_frame() {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error building status: {}", e),
    }
}

fn print_rules(session: &Session) {
    let rules = session.rules();
    println!("Opener by          : {}", rules.opener_by);
    println!("Closer until       : {}", rules.closer_until);
    println!("Midday             : {}", rules.midday);
}

fn print_calendar_info(session: &Session) {
    let config = session.calendar_config();
    let working_days = config
        .working_days()
        .iter()
        .map(|wd| wd.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let holidays = config
        .holidays()
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Working days       : {}", working_days);
    println!("Holidays           : {}", holidays);
    println!("Roster days        : {}", session.month_dates().len());
}

/// Full ISO date, or a bare day number inside the selected month.
fn parse_date_arg(session: &Session, s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    let day = s.parse::<u32>().ok()?;
    let month = session.month();
    NaiveDate::from_ymd_opt(month.year(), month.month(), day)
}

/// Split `<name...> <date|day> <rest...>`. The date is the first token after
/// the name that reads as one, so names may contain spaces.
fn split_name_and_date<'a>(
    session: &Session,
    args: &'a str,
) -> Option<(String, NaiveDate, &'a str)> {
    let words: Vec<&str> = args.split_whitespace().collect();
    (1..words.len()).find_map(|idx| {
        let date = parse_date_arg(session, words[idx])?;
        let name = words[..idx].join(" ");
        Some((name, date, rest_of_line(args, idx + 1)))
    })
}

fn parse_rules(args: &mut std::str::SplitWhitespace) -> Result<CoverageRules, String> {
    let mut next = |what: &str| -> Result<TimeOfDay, String> {
        let raw = args.next().ok_or_else(|| format!("missing {what} time"))?;
        raw.parse::<TimeOfDay>().map_err(|e| e.to_string())
    };
    Ok(CoverageRules {
        opener_by: next("opener")?,
        closer_until: next("closer")?,
        midday: next("midday")?,
    })
}

fn rest_of_line<'a>(input: &'a str, skip_words: usize) -> &'a str {
    let mut rest = input;
    for _ in 0..skip_words {
        rest = rest.trim_start();
        rest = rest
            .find(char::is_whitespace)
            .map(|idx| &rest[idx..])
            .unwrap_or("");
    }
    rest.trim()
}

fn handle_calendar(session: &mut Session, input: &str, parts: &mut std::str::SplitWhitespace) {
    match parts.next() {
        Some("show") => print_calendar_info(session),
        Some("saturday") => {
            let working = match parts.next() {
                Some("on") => true,
                Some("off") => false,
                _ => {
                    println!("Usage: calendar saturday <on|off>");
                    return;
                }
            };
            match session
                .calendar_mut()
                .set_weekday_working(Weekday::Sat, working)
            {
                Ok(()) => print_calendar_info(session),
                Err(e) => println!("Error: {}", e),
            }
        }
        Some("holiday") => match parts.next().map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d")) {
            Some(Ok(date)) => {
                session.calendar_mut().add_holiday(date);
                println!("Holiday added: {}", date);
            }
            _ => println!("Usage: calendar holiday <YYYY-MM-DD>"),
        },
        Some("us-holidays") => match parts.next().and_then(|s| s.parse::<i32>().ok()) {
            Some(year) => {
                session.calendar_mut().add_us_holidays(year);
                println!("US federal holidays added for {}", year);
            }
            None => println!("Usage: calendar us-holidays <year>"),
        },
        Some("set") => {
            let path = rest_of_line(input, 2);
            if path.is_empty() {
                println!("Usage: calendar set <json_path>");
                return;
            }
            let loaded = fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|raw| {
                    serde_json::from_str::<WorkCalendarConfig>(&raw).map_err(|e| e.to_string())
                })
                .and_then(|config| {
                    session
                        .set_calendar_from_config(&config)
                        .map_err(|e| e.to_string())
                });
            match loaded {
                Ok(()) => println!("Calendar loaded from {}", path),
                Err(e) => println!("Error loading calendar: {}", e),
            }
        }
        Some("save") => {
            let path = rest_of_line(input, 2);
            if path.is_empty() {
                println!("Usage: calendar save <json_path>");
                return;
            }
            let saved = serde_json::to_string_pretty(&session.calendar_config())
                .map_err(|e| e.to_string())
                .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
            match saved {
                Ok(()) => println!("Calendar saved to {}", path),
                Err(e) => println!("Error saving calendar: {}", e),
            }
        }
        _ => println!("Usage: calendar <show|saturday|holiday|us-holidays|set|save> ..."),
    }
}

fn main() {
    logging::init();

    let config = match SchedulerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("Config error ({}); using defaults.", e);
            SchedulerConfig::default()
        }
    };
    let mut session = match Session::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            println!("Config error ({}); using defaults.", e);
            Session::new()
        }
    };

    println!("Pharmacy Shift Scheduler (CLI) - type 'help' for commands\n");
    print_grid(&session);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_grid(&session),
            "status" => print_status(&session),
            "months" => {
                for month in session.months() {
                    let marker = if *month == session.month() { "*" } else { " " };
                    println!("{} {}", marker, month);
                }
            }
            "month" => match parts.next().map(str::parse::<YearMonth>) {
                Some(Ok(month)) => match session.select_month(month) {
                    Ok(()) => print_grid(&session),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: month <YYYY-MM>"),
            },
            "add" => {
                let name = rest_of_line(input, 1);
                match session.add_person(name) {
                    Ok(name) => println!("Added pharmacist {}.", name),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "remove" => {
                let name = rest_of_line(input, 1);
                match session.remove_person(name) {
                    Ok(discarded) => {
                        println!("Removed pharmacist {} ({} shifts discarded).", name, discarded)
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "set" | "clear" => {
                let args = rest_of_line(input, 1);
                if args.split_whitespace().count() < 2 {
                    println!("Usage: {} <name...> <date|day>{}", cmd, if cmd == "set" { " <shift...>" } else { "" });
                    continue;
                }
                let Some((name, date, shift_text)) = split_name_and_date(&session, args) else {
                    println!("Invalid date (YYYY-MM-DD or day of month)");
                    continue;
                };
                let raw = if cmd == "set" { shift_text } else { "" };
                match session.edit_cell(&name, date, raw) {
                    Ok(CellEdit::Accepted(assignment)) => {
                        println!("{} {}: {}", name, date, assignment.cell_text());
                        if assignment.is_inverted() {
                            println!("Warning: shift ends before it starts.");
                        }
                        if !session.month_dates().contains(&date) {
                            println!("Note: {} is not a roster day of {}.", date, session.month());
                        }
                    }
                    Ok(CellEdit::Cleared) => println!("{} {}: cleared", name, date),
                    Ok(CellEdit::Rejected(reason)) => {
                        println!("Rejected '{}': {} (previous value kept)", raw, reason)
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "parse" => match parse_shift(rest_of_line(input, 1)) {
                ShiftParse::Empty => println!("empty"),
                ShiftParse::Malformed(reason) => println!("malformed: {}", reason),
                ShiftParse::Parsed(start, end) => {
                    println!("{}", shift_coverage::format_shift(start, end))
                }
            },
            "export" => {
                let dir = rest_of_line(input, 1);
                let dir = if dir.is_empty() { "." } else { dir };
                match session.export_to_dir(dir) {
                    Ok(path) => println!("Exported to {}", path.display()),
                    Err(e) => println!("Export error: {}", e),
                }
            }
            "import" => {
                let path = rest_of_line(input, 1);
                if path.is_empty() {
                    println!("Usage: import <path>");
                    continue;
                }
                let result = fs::File::open(path)
                    .map_err(shift_coverage::ExportError::from)
                    .and_then(|file| session.import_csv(file));
                match result {
                    Ok(summary) => {
                        println!(
                            "Imported {} shifts ({} cleared, {} rejected, {} pharmacists added).",
                            summary.accepted,
                            summary.cleared,
                            summary.rejected.len(),
                            summary.people_added
                        );
                        for cell in &summary.rejected {
                            println!("  {} {} '{}': {}", cell.person, cell.date, cell.input, cell.reason);
                        }
                    }
                    Err(e) => println!("Import error: {}", e),
                }
            }
            "rules" => match parts.next() {
                Some("show") | None => print_rules(&session),
                Some("set") => match parse_rules(&mut parts) {
                    Ok(rules) => {
                        session.set_rules(rules);
                        print_rules(&session);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                Some(_) => println!("Usage: rules <show|set <opener> <closer> <midday>>"),
            },
            "calendar" => handle_calendar(&mut session, input, &mut parts),
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
