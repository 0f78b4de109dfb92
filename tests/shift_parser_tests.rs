use shift_coverage::{MalformedShift, ShiftParse, TimeOfDay, parse_shift};

fn t(h: u32, m: u32) -> TimeOfDay {
    TimeOfDay::new(h, m).unwrap()
}

#[test]
fn meridiem_shifts_parse_to_24_hour_pairs() {
    assert_eq!(parse_shift("7am-3pm"), ShiftParse::Parsed(t(7, 0), t(15, 0)));
    assert_eq!(
        parse_shift("3:30pm-11:15pm"),
        ShiftParse::Parsed(t(15, 30), t(23, 15))
    );
}

#[test]
fn free_text_and_normalized_forms_agree() {
    let free = parse_shift("8am-5pm");
    let normalized = parse_shift("08:00-17:00");
    assert_eq!(free, normalized);
    assert_eq!(free.pair(), Some((t(8, 0), t(17, 0))));
}

#[test]
fn compact_digit_forms() {
    assert_eq!(parse_shift("830-1700"), ShiftParse::Parsed(t(8, 30), t(17, 0)));
    assert_eq!(parse_shift("7-12"), ShiftParse::Parsed(t(7, 0), t(12, 0)));
}

#[test]
fn blank_and_nan_cells_are_empty() {
    for raw in ["", "   ", "nan", "NaN", "  NAN  ", "\t"] {
        assert_eq!(parse_shift(raw), ShiftParse::Empty, "input {raw:?}");
    }
}

#[test]
fn malformed_inputs_never_parse() {
    for raw in ["abc", "8-", "25:00-17:00", "8-5-3", "-", "am-pm", "8:00-17:60"] {
        let parsed = parse_shift(raw);
        assert!(parsed.is_malformed(), "input {raw:?} gave {parsed:?}");
    }
}

#[test]
fn malformed_reasons_name_the_offending_token() {
    assert_eq!(
        parse_shift("25:00-17:00"),
        ShiftParse::Malformed(MalformedShift::OutOfRange("25:00".into()))
    );
    assert_eq!(
        parse_shift("8-"),
        ShiftParse::Malformed(MalformedShift::NotATime("".into()))
    );
}

#[test]
fn midnight_edge_cases() {
    assert_eq!(parse_shift("12am-8am"), ShiftParse::Parsed(t(0, 0), t(8, 0)));
    assert_eq!(parse_shift("12pm-12:30pm"), ShiftParse::Parsed(t(12, 0), t(12, 30)));
}

#[test]
fn inverted_ranges_are_not_rejected_by_the_parser() {
    assert_eq!(parse_shift("17:00-08:00"), ShiftParse::Parsed(t(17, 0), t(8, 0)));
}
