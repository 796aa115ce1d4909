use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};
use crate::time::dates::{
    add_days, add_months, diff_days, end_of_month, end_of_year, parse_utc, start_of_month,
    start_of_quarter, start_of_week, start_of_year,
};
use crate::time::Clock;

/// Either a named preset or an explicit start/end pair. A preset wins when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RangeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl RangeSpec {
    pub fn preset(name: impl Into<String>) -> Self {
        Self {
            preset: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn explicit(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            preset: None,
            start_date: Some(start.into()),
            end_date: Some(end.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    NextMonth,
    ThisQuarter,
    ThisYear,
    NextDays(u32),
    LastDays(u32),
}

impl FromStr for Preset {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|ch| if ch == ' ' || ch == '-' { '_' } else { ch })
            .collect();
        let preset = match normalized.as_str() {
            "today" => Preset::Today,
            "this_week" => Preset::ThisWeek,
            "this_month" => Preset::ThisMonth,
            "last_month" => Preset::LastMonth,
            "next_month" => Preset::NextMonth,
            "this_quarter" => Preset::ThisQuarter,
            "this_year" => Preset::ThisYear,
            other => parse_day_count(other)
                .ok_or_else(|| ForecastError::InvalidRangeSpec(format!("unknown preset `{raw}`")))?,
        };
        Ok(preset)
    }
}

fn parse_day_count(normalized: &str) -> Option<Preset> {
    let (direction, rest) = normalized.split_once('_')?;
    let days = rest.strip_suffix("_days")?.parse::<u32>().ok()?;
    if days == 0 {
        return None;
    }
    match direction {
        "next" => Some(Preset::NextDays(days)),
        "last" => Some(Preset::LastDays(days)),
        _ => None,
    }
}

impl Preset {
    /// Inclusive bounds of the preset relative to `today`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Preset::Today => (today, today),
            Preset::ThisWeek => {
                let start = start_of_week(today);
                (start, add_days(start, 6))
            }
            Preset::ThisMonth => (start_of_month(today), end_of_month(today)),
            Preset::LastMonth => {
                let end = add_days(start_of_month(today), -1);
                (start_of_month(end), end)
            }
            Preset::NextMonth => {
                let start = add_days(end_of_month(today), 1);
                (start, end_of_month(start))
            }
            Preset::ThisQuarter => {
                let start = start_of_quarter(today);
                let end = add_months(start, 3)
                    .map(|next| add_days(next, -1))
                    .unwrap_or_else(|| end_of_year(today));
                (start, end)
            }
            Preset::ThisYear => (start_of_year(today), end_of_year(today)),
            Preset::NextDays(days) => (today, add_days(today, i64::from(days) - 1)),
            Preset::LastDays(days) => (add_days(today, 1 - i64::from(days)), today),
        }
    }
}

/// Concrete report window split at the cutoff day.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cutoff: NaiveDate,
    pub days: i64,
    pub days_completed: i64,
    pub days_remaining: i64,
}

impl DateRange {
    /// Builds the range with `cutoff = clamp(today, start, end)`.
    ///
    /// When `today` is past `end` the whole range has elapsed: every day counts
    /// as completed and nothing remains to project.
    pub fn new(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidRangeSpec(format!(
                "start {start} is after end {end}"
            )));
        }
        let cutoff = today.clamp(start, end);
        let days = diff_days(start, end) + 1;
        let days_completed = if today > end {
            days
        } else {
            diff_days(start, cutoff).max(0)
        };
        Ok(Self {
            start,
            end,
            cutoff,
            days,
            days_completed,
            days_remaining: diff_days(cutoff, end).max(0),
        })
    }

    /// True once every day of the range lies before today.
    pub fn is_elapsed(&self) -> bool {
        self.days_completed == self.days
    }

    /// Exclusive upper bound of the collected-revenue window: the cutoff while the
    /// range is open, the day after `end` once it has elapsed.
    pub fn actual_window_end(&self) -> NaiveDate {
        if self.is_elapsed() {
            add_days(self.end, 1)
        } else {
            self.cutoff
        }
    }

    pub fn resolve(spec: &RangeSpec, clock: &dyn Clock) -> Result<Self> {
        let today = clock.today();
        if let Some(name) = spec.preset.as_deref().filter(|name| !name.trim().is_empty()) {
            let (start, end) = name.parse::<Preset>()?.bounds(today);
            return Self::new(start, end, today);
        }
        match (spec.start_date.as_deref(), spec.end_date.as_deref()) {
            (Some(start), Some(end)) => Self::new(parse_utc(start)?, parse_utc(end)?, today),
            _ => Err(ForecastError::InvalidRangeSpec(
                "expected a preset or both startDate and endDate".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(ymd(2025, 2, 12))
    }

    #[test]
    fn this_month_splits_at_today() {
        let range = DateRange::resolve(&RangeSpec::preset("this_month"), &clock()).unwrap();
        assert_eq!(range.start, ymd(2025, 2, 1));
        assert_eq!(range.end, ymd(2025, 2, 28));
        assert_eq!(range.cutoff, ymd(2025, 2, 12));
        assert_eq!(range.days, 28);
        assert_eq!(range.days_completed, 11);
        assert_eq!(range.days_remaining, 16);
    }

    #[test]
    fn preset_names_are_normalized() {
        assert_eq!("This Month".parse::<Preset>().unwrap(), Preset::ThisMonth);
        assert_eq!("next-30-days".parse::<Preset>().unwrap(), Preset::NextDays(30));
        assert_eq!("last_7_days".parse::<Preset>().unwrap(), Preset::LastDays(7));
        assert!("next_0_days".parse::<Preset>().is_err());
        assert!("fortnight".parse::<Preset>().is_err());
    }

    #[test]
    fn preset_bounds() {
        let today = ymd(2025, 2, 12);
        assert_eq!(
            Preset::LastMonth.bounds(today),
            (ymd(2025, 1, 1), ymd(2025, 1, 31))
        );
        assert_eq!(
            Preset::NextMonth.bounds(today),
            (ymd(2025, 3, 1), ymd(2025, 3, 31))
        );
        assert_eq!(
            Preset::ThisQuarter.bounds(today),
            (ymd(2025, 1, 1), ymd(2025, 3, 31))
        );
        assert_eq!(
            Preset::ThisWeek.bounds(today),
            (ymd(2025, 2, 10), ymd(2025, 2, 16))
        );
        assert_eq!(
            Preset::NextDays(30).bounds(today),
            (ymd(2025, 2, 12), ymd(2025, 3, 13))
        );
        assert_eq!(
            Preset::LastDays(7).bounds(today),
            (ymd(2025, 2, 6), ymd(2025, 2, 12))
        );
    }

    #[test]
    fn preset_takes_precedence_over_explicit_dates() {
        let spec = RangeSpec {
            preset: Some("today".into()),
            start_date: Some("garbage".into()),
            end_date: None,
        };
        let range = DateRange::resolve(&spec, &clock()).unwrap();
        assert_eq!(range.start, range.end);
        assert_eq!(range.days, 1);
    }

    #[test]
    fn explicit_range_clamps_cutoff() {
        let past = DateRange::resolve(&RangeSpec::explicit("2024-01-01", "2024-01-31"), &clock())
            .unwrap();
        assert_eq!(past.cutoff, past.end);
        assert_eq!(past.days_remaining, 0);
        assert_eq!(past.days_completed, 31);
        assert!(past.is_elapsed());
        assert_eq!(past.actual_window_end(), ymd(2024, 2, 1));

        let future =
            DateRange::resolve(&RangeSpec::explicit("2026-01-01", "2026-01-31T00:00:00Z"), &clock())
                .unwrap();
        assert_eq!(future.cutoff, future.start);
        assert_eq!(future.days_completed, 0);
        assert_eq!(future.days_remaining, 30);
        assert!(!future.is_elapsed());
        assert_eq!(future.actual_window_end(), future.start);
    }

    #[test]
    fn range_ending_today_is_still_open() {
        let range = DateRange::new(ymd(2025, 2, 1), ymd(2025, 2, 12), ymd(2025, 2, 12)).unwrap();
        assert_eq!(range.cutoff, range.end);
        assert_eq!(range.days_completed, 11);
        assert_eq!(range.days_remaining, 0);
        assert!(!range.is_elapsed());
        assert_eq!(range.actual_window_end(), ymd(2025, 2, 12));
    }

    #[test]
    fn invalid_specs_are_rejected() {
        assert!(matches!(
            DateRange::resolve(&RangeSpec::default(), &clock()),
            Err(ForecastError::InvalidRangeSpec(_))
        ));
        assert!(matches!(
            DateRange::resolve(&RangeSpec::explicit("2025-02-10", "2025-02-01"), &clock()),
            Err(ForecastError::InvalidRangeSpec(_))
        ));
        assert_eq!(
            DateRange::resolve(&RangeSpec::explicit("2025-02-30", "2025-03-01"), &clock()),
            Err(ForecastError::InvalidDateFormat("2025-02-30".into()))
        );
    }
}
