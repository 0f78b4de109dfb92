use crate::time_of_day::TimeOfDay;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds a day's shifts are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageRules {
    /// Someone must start at or before this time.
    pub opener_by: TimeOfDay,
    /// Someone must still be on shift at or after this time.
    pub closer_until: TimeOfDay,
    /// Some single shift must span this instant.
    pub midday: TimeOfDay,
}

impl Default for CoverageRules {
    fn default() -> Self {
        Self {
            opener_by: TimeOfDay::from_parts(7, 45),
            closer_until: TimeOfDay::from_parts(17, 0),
            midday: TimeOfDay::NOON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageRule {
    Opener,
    Closer,
    Midday,
}

impl fmt::Display for CoverageRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CoverageRule::Opener => "opener",
            CoverageRule::Closer => "closer",
            CoverageRule::Midday => "midday",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Adequate,
    Inadequate,
}

impl Verdict {
    /// Tile text shown next to the date.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Adequate => "OK",
            Verdict::Inadequate => "MISSING",
        }
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value {
            Verdict::Adequate
        } else {
            Verdict::Inadequate
        }
    }
}

/// Verdict plus the rules that were not met, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCheck {
    pub verdict: Verdict,
    pub failed: Vec<CoverageRule>,
}

/// Evaluate one day's intervals. An empty input fails every rule.
pub fn check_day<I>(intervals: I, rules: &CoverageRules) -> CoverageCheck
where
    I: IntoIterator<Item = (TimeOfDay, TimeOfDay)>,
{
    let mut earliest_start: Option<TimeOfDay> = None;
    let mut latest_end: Option<TimeOfDay> = None;
    let mut covers_midday = false;

    for (start, end) in intervals {
        earliest_start = Some(earliest_start.map_or(start, |current| current.min(start)));
        latest_end = Some(latest_end.map_or(end, |current| current.max(end)));
        if start <= rules.midday && rules.midday <= end {
            covers_midday = true;
        }
    }

    let mut failed = Vec::new();
    if !earliest_start.is_some_and(|start| start <= rules.opener_by) {
        failed.push(CoverageRule::Opener);
    }
    if !latest_end.is_some_and(|end| end >= rules.closer_until) {
        failed.push(CoverageRule::Closer);
    }
    if !covers_midday {
        failed.push(CoverageRule::Midday);
    }

    CoverageCheck {
        verdict: Verdict::from(failed.is_empty()),
        failed,
    }
}

pub fn validate_day<I>(intervals: I, rules: &CoverageRules) -> Verdict
where
    I: IntoIterator<Item = (TimeOfDay, TimeOfDay)>,
{
    check_day(intervals, rules).verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn thresholds_are_inclusive() {
        let rules = CoverageRules::default();
        let check = check_day([(t(7, 45), t(17, 0))], &rules);
        assert_eq!(check.verdict, Verdict::Adequate);
        assert!(check.failed.is_empty());
    }

    #[test]
    fn empty_day_fails_every_rule() {
        let check = check_day(std::iter::empty(), &CoverageRules::default());
        assert_eq!(check.verdict, Verdict::Inadequate);
        assert_eq!(
            check.failed,
            vec![CoverageRule::Opener, CoverageRule::Closer, CoverageRule::Midday]
        );
    }

    #[test]
    fn split_shifts_without_noon_overlap_miss_midday() {
        let check = check_day(
            [(t(7, 0), t(11, 59)), (t(12, 1), t(18, 0))],
            &CoverageRules::default(),
        );
        assert_eq!(check.failed, vec![CoverageRule::Midday]);
    }

    #[test]
    fn custom_rules_move_the_thresholds() {
        let rules = CoverageRules {
            opener_by: t(8, 0),
            closer_until: t(16, 0),
            midday: t(13, 0),
        };
        assert_eq!(validate_day([(t(8, 0), t(16, 0))], &rules), Verdict::Adequate);
        assert_eq!(
            validate_day([(t(8, 0), t(16, 0))], &CoverageRules::default()),
            Verdict::Inadequate
        );
    }

    #[test]
    fn labels() {
        assert_eq!(Verdict::Adequate.label(), "OK");
        assert_eq!(Verdict::Inadequate.label(), "MISSING");
    }
}
