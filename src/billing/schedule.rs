use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::contract::Contract;
use crate::time::dates::{add_days, add_months, diff_days, is_within_range, months_between};

/// Billing cadence parsed once from the free-text interval/frequency pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BillingSchedule {
    Once,
    Weekly { step_weeks: u32 },
    Monthly { step_months: u32 },
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Once,
    Week,
    Month,
}

impl BillingSchedule {
    /// Interprets `billing_interval` (`Weekly`, `Monthly`, `Once`, ...) together with
    /// `billing_frequency` (`"1 Week"`, `"4 Weeks"`, `"Once"`, ...).
    ///
    /// The interval decides the unit; the frequency's trailing unit word is only
    /// consulted when the interval is not one of the known values.
    pub fn parse(billing_interval: &str, billing_frequency: &str) -> Self {
        let interval_cadence = cadence_from_word(billing_interval);
        if interval_cadence == Some(Cadence::Once)
            || cadence_from_word(billing_frequency) == Some(Cadence::Once)
        {
            return BillingSchedule::Once;
        }

        let Some((step, frequency_cadence)) = parse_frequency(billing_frequency) else {
            return BillingSchedule::Unrecognized;
        };
        if step == 0 {
            return BillingSchedule::Unrecognized;
        }

        match interval_cadence.or(frequency_cadence) {
            Some(Cadence::Week) => BillingSchedule::Weekly { step_weeks: step },
            Some(Cadence::Month) => BillingSchedule::Monthly { step_months: step },
            Some(Cadence::Once) | None => BillingSchedule::Unrecognized,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            BillingSchedule::Weekly { .. } | BillingSchedule::Monthly { .. }
        )
    }

    pub fn label(&self) -> String {
        match *self {
            BillingSchedule::Once => "Once".into(),
            BillingSchedule::Weekly { step_weeks: 1 } => "Weekly".into(),
            BillingSchedule::Weekly { step_weeks } => format!("Every {step_weeks} Weeks"),
            BillingSchedule::Monthly { step_months: 1 } => "Monthly".into(),
            BillingSchedule::Monthly { step_months } => format!("Every {step_months} Months"),
            BillingSchedule::Unrecognized => "Unrecognized".into(),
        }
    }

    /// Dates in `[window_start, window_end]` reached from `anchor` by whole steps.
    pub fn dates_in_window(
        &self,
        anchor: NaiveDate,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Vec<NaiveDate> {
        if window_end < window_start {
            return Vec::new();
        }
        match *self {
            BillingSchedule::Once => {
                if is_within_range(anchor, window_start, window_end) {
                    vec![anchor]
                } else {
                    Vec::new()
                }
            }
            BillingSchedule::Weekly { step_weeks } => {
                weekly_dates(anchor, step_weeks, window_start, window_end)
            }
            BillingSchedule::Monthly { step_months } => {
                monthly_dates(anchor, step_months, window_start, window_end)
            }
            BillingSchedule::Unrecognized => Vec::new(),
        }
    }
}

/// Occurrence dates a contract bills on within `[window_start, window_end]`.
///
/// Inactive contracts, contracts without a next bill date and unrecognized
/// schedules produce nothing.
pub fn occurrences(
    contract: &Contract,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    if !contract.is_active() {
        return Vec::new();
    }
    let Some(anchor) = contract.next_bill_date else {
        return Vec::new();
    };
    contract
        .schedule
        .dates_in_window(anchor, window_start, window_end)
}

fn weekly_dates(
    anchor: NaiveDate,
    step_weeks: u32,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let step_days = i64::from(step_weeks) * 7;
    let mut current = if anchor >= window_start {
        anchor
    } else {
        let gap = diff_days(anchor, window_start);
        let steps = (gap + step_days - 1) / step_days;
        add_days(anchor, steps * step_days)
    };

    let mut dates = Vec::new();
    while current <= window_end {
        dates.push(current);
        let next = add_days(current, step_days);
        if next <= current {
            break;
        }
        current = next;
    }
    dates
}

fn monthly_dates(
    anchor: NaiveDate,
    step_months: u32,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    // Each date is derived from the anchor so a 31st does not decay to the 28th.
    let lead = months_between(anchor, window_start).max(0);
    let mut index = u32::try_from(lead / i64::from(step_months)).unwrap_or(u32::MAX);

    let mut dates = Vec::new();
    loop {
        let Some(date) = index
            .checked_mul(step_months)
            .and_then(|offset| add_months(anchor, offset))
        else {
            break;
        };
        if date > window_end {
            break;
        }
        if date >= window_start {
            dates.push(date);
        }
        let Some(next) = index.checked_add(1) else {
            break;
        };
        index = next;
    }
    dates
}

fn cadence_from_word(word: &str) -> Option<Cadence> {
    match word.trim().to_ascii_lowercase().as_str() {
        "once" | "one-time" | "one time" => Some(Cadence::Once),
        "week" | "weeks" | "weekly" => Some(Cadence::Week),
        "month" | "months" | "monthly" => Some(Cadence::Month),
        _ => None,
    }
}

/// Splits `"4 Weeks"` / `"Every 2 Months"` / `"Weekly"` into a step and optional unit.
fn parse_frequency(frequency: &str) -> Option<(u32, Option<Cadence>)> {
    let mut tokens = frequency
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("every"))
        .peekable();
    let first = tokens.next()?;
    match first.parse::<u32>() {
        Ok(step) => {
            let unit = match tokens.next() {
                Some(word) => Some(cadence_from_word(word)?),
                None => None,
            };
            if tokens.next().is_some() {
                return None;
            }
            Some((step, unit))
        }
        Err(_) => {
            let unit = cadence_from_word(first)?;
            if tokens.peek().is_some() {
                return None;
            }
            Some((1, Some(unit)))
        }
    }
}
