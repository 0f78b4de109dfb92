use crate::shift::{self, MalformedShift, ShiftParse};
use crate::time_of_day::TimeOfDay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, info, warn};

/// One person's shift on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub person: String,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ShiftAssignment {
    pub fn new(person: impl Into<String>, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            person: person.into(),
            date,
            start,
            end,
        }
    }

    pub fn interval(&self) -> (TimeOfDay, TimeOfDay) {
        (self.start, self.end)
    }

    /// End before start; kept as entered, e.g. an overnight shift.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn cell_text(&self) -> String {
        shift::format_shift(self.start, self.end)
    }
}

/// Everything assigned on a single date, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub assignments: Vec<ShiftAssignment>,
}

impl DaySchedule {
    pub fn intervals(&self) -> impl Iterator<Item = (TimeOfDay, TimeOfDay)> + '_ {
        self.assignments.iter().map(ShiftAssignment::interval)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("pharmacist name must not be empty")]
    EmptyName,
    #[error("pharmacist '{0}' is already on the roster")]
    DuplicatePerson(String),
    #[error("pharmacist '{0}' is not on the roster")]
    UnknownPerson(String),
}

/// Result of writing free text into a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEdit {
    Accepted(ShiftAssignment),
    /// The cell was blanked; any previous shift is gone.
    Cleared,
    /// Nothing changed; the previous value, if any, is still in place.
    Rejected(MalformedShift),
}

/// Roster plus per-person shifts for the current editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStore {
    roster: Vec<String>,
    shifts: HashMap<String, BTreeMap<NaiveDate, ShiftAssignment>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &[String] {
        &self.roster
    }

    pub fn contains_person(&self, name: &str) -> bool {
        self.shifts.contains_key(name.trim())
    }

    /// Returns the stored (trimmed) name.
    pub fn add_person(&mut self, name: &str) -> Result<String, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.shifts.contains_key(name) {
            return Err(RosterError::DuplicatePerson(name.to_string()));
        }
        self.roster.push(name.to_string());
        self.shifts.insert(name.to_string(), BTreeMap::new());
        info!(person = name, "pharmacist added");
        Ok(name.to_string())
    }

    /// Drops the person and every shift they held. Returns how many shifts went.
    pub fn remove_person(&mut self, name: &str) -> Result<usize, RosterError> {
        let name = name.trim();
        let removed = self
            .shifts
            .remove(name)
            .ok_or_else(|| RosterError::UnknownPerson(name.to_string()))?;
        self.roster.retain(|p| p != name);
        info!(person = name, discarded = removed.len(), "pharmacist removed");
        Ok(removed.len())
    }

    fn person_shifts_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut BTreeMap<NaiveDate, ShiftAssignment>, RosterError> {
        self.shifts
            .get_mut(name)
            .ok_or_else(|| RosterError::UnknownPerson(name.to_string()))
    }

    pub fn assignment(&self, person: &str, date: NaiveDate) -> Option<&ShiftAssignment> {
        self.shifts.get(person.trim())?.get(&date)
    }

    /// Store a shift, replacing whatever the cell held. Returns the old value.
    fn insert_assignment(
        &mut self,
        assignment: ShiftAssignment,
    ) -> Result<Option<ShiftAssignment>, RosterError> {
        if assignment.is_inverted() {
            warn!(
                person = %assignment.person,
                date = %assignment.date,
                start = %assignment.start,
                end = %assignment.end,
                "shift ends before it starts"
            );
        }
        let date = assignment.date;
        let shifts = self.person_shifts_mut(&assignment.person)?;
        Ok(shifts.insert(date, assignment))
    }

    pub fn clear_cell(
        &mut self,
        person: &str,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, RosterError> {
        let person = person.trim();
        Ok(self.person_shifts_mut(person)?.remove(&date))
    }

    /// Parse `raw` and apply it to the (person, date) cell.
    pub fn edit_cell(
        &mut self,
        person: &str,
        date: NaiveDate,
        raw: &str,
    ) -> Result<CellEdit, RosterError> {
        let person = person.trim();
        if !self.shifts.contains_key(person) {
            return Err(RosterError::UnknownPerson(person.to_string()));
        }
        match shift::parse_shift(raw) {
            ShiftParse::Parsed(start, end) => {
                let assignment = ShiftAssignment::new(person, date, start, end);
                self.insert_assignment(assignment.clone())?;
                debug!(person, %date, shift = %assignment.cell_text(), "cell accepted");
                Ok(CellEdit::Accepted(assignment))
            }
            ShiftParse::Empty => {
                self.clear_cell(person, date)?;
                debug!(person, %date, "cell cleared");
                Ok(CellEdit::Cleared)
            }
            ShiftParse::Malformed(reason) => {
                warn!(person, %date, input = raw, %reason, "cell rejected");
                Ok(CellEdit::Rejected(reason))
            }
        }
    }

    pub fn day_schedule(&self, date: NaiveDate) -> DaySchedule {
        let assignments = self
            .roster
            .iter()
            .filter_map(|person| self.shifts.get(person)?.get(&date).cloned())
            .collect();
        DaySchedule { date, assignments }
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    #[test]
    fn names_are_trimmed_and_unique() {
        let mut store = ScheduleStore::new();
        assert_eq!(store.add_person("  Ana "), Ok("Ana".to_string()));
        assert_eq!(
            store.add_person("Ana"),
            Err(RosterError::DuplicatePerson("Ana".into()))
        );
        assert_eq!(store.add_person("   "), Err(RosterError::EmptyName));
        assert!(store.contains_person(" Ana"));
    }

    #[test]
    fn day_schedule_follows_roster_order() {
        let mut store = ScheduleStore::new();
        store.add_person("Zoe").unwrap();
        store.add_person("Ana").unwrap();
        store.edit_cell("Ana", d(1), "9-17").unwrap();
        store.edit_cell("Zoe", d(1), "7-12").unwrap();
        let day = store.day_schedule(d(1));
        let order: Vec<&str> = day.assignments.iter().map(|a| a.person.as_str()).collect();
        assert_eq!(order, vec!["Zoe", "Ana"]);
    }

    #[test]
    fn re_edit_replaces_the_cell() {
        let mut store = ScheduleStore::new();
        store.add_person("Ana").unwrap();
        store.edit_cell("Ana", d(1), "7-15").unwrap();
        let edit = store.edit_cell("Ana", d(1), "9am-5pm").unwrap();
        let stored = store.assignment("Ana", d(1)).cloned();
        assert_eq!(edit, CellEdit::Accepted(stored.clone().unwrap()));
        assert_eq!(stored.unwrap().cell_text(), "09:00-17:00");
        assert_eq!(store.shift_count(), 1);
    }

    #[test]
    fn inverted_shift_is_kept() {
        let mut store = ScheduleStore::new();
        store.add_person("Ana").unwrap();
        let edit = store.edit_cell("Ana", d(1), "22:00-06:00").unwrap();
        match edit {
            CellEdit::Accepted(assignment) => assert!(assignment.is_inverted()),
            other => panic!("unexpected edit {other:?}"),
        }
    }
}
