use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::contract::Contract;
use super::schedule::BillingSchedule;

/// Average number of weeks in a calendar month.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.345);

/// How many times a schedule bills in an average month. One-time and
/// unrecognized schedules never contribute to a recurring rate.
pub fn payments_per_month(schedule: &BillingSchedule) -> Decimal {
    match *schedule {
        BillingSchedule::Weekly { step_weeks } => WEEKS_PER_MONTH / Decimal::from(step_weeks),
        BillingSchedule::Monthly { step_months } => Decimal::ONE / Decimal::from(step_months),
        BillingSchedule::Once | BillingSchedule::Unrecognized => Decimal::ZERO,
    }
}

/// Monthly-equivalent revenue of a single contract, regardless of its status.
pub fn calculate_mrr(contract: &Contract) -> Decimal {
    match contract.schedule {
        BillingSchedule::Weekly { step_weeks } => {
            contract.amount.saturating_mul(WEEKS_PER_MONTH) / Decimal::from(step_weeks)
        }
        BillingSchedule::Monthly { step_months } => {
            contract.amount / Decimal::from(step_months)
        }
        BillingSchedule::Once | BillingSchedule::Unrecognized => Decimal::ZERO,
    }
}

/// Sum of [`calculate_mrr`] over active contracts, saturating at the `Decimal` bounds.
pub fn calculate_total_mrr(contracts: &[Contract]) -> Decimal {
    contracts
        .iter()
        .filter(|contract| contract.is_active())
        .map(calculate_mrr)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
