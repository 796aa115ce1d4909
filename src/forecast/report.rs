use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use super::actual::{aggregate_actual, ActualRevenue};
use super::categories::CustomerCategoryMap;
use super::projection::{project, DailyProjectionEntry, Projection};
use super::range::{DateRange, RangeSpec};
use crate::billing::{calculate_total_mrr, Contract, ContractStatus, Transaction};
use crate::errors::Result;
use crate::time::Clock;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRevenue {
    pub total: Decimal,
    pub contract_count: usize,
    pub upcoming_payments: Vec<DailyProjectionEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub expected: Decimal,
    pub actual_percentage: Decimal,
    pub projected_percentage: Decimal,
}

impl MonthlyTotal {
    /// Percentages keep full precision and always sum to 100 unless both sides are zero.
    pub fn from_parts(actual: Decimal, projected: Decimal) -> Self {
        let expected = actual.saturating_add(projected);
        if expected.is_zero() {
            return Self {
                expected,
                actual_percentage: Decimal::ZERO,
                projected_percentage: Decimal::ZERO,
            };
        }
        let actual_percentage = actual
            .checked_div(expected)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .unwrap_or_else(|| {
                if actual.is_sign_negative() == expected.is_sign_negative() {
                    Decimal::MAX
                } else {
                    Decimal::MIN
                }
            });
        Self {
            expected,
            actual_percentage,
            projected_percentage: dec!(100).saturating_sub(actual_percentage),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    pub total_transactions: u32,
    pub approved_transactions: u32,
    pub declined_transactions: u32,
    pub active_contracts: usize,
    pub cancelled_contracts: usize,
    pub completed_contracts: usize,
    pub monthly_recurring_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub date_range: DateRange,
    pub actual_revenue: ActualRevenue,
    pub projected_revenue: ProjectedRevenue,
    pub monthly_total: MonthlyTotal,
    pub metrics: ForecastMetrics,
}

/// Blends collected revenue before the cutoff with projected revenue from the cutoff on.
/// A range that ended before today is reported entirely as collected revenue.
///
/// Pure function of its inputs and `clock`: identical inputs give identical reports.
pub fn generate_forecast(
    contracts: &[Contract],
    transactions: &[Transaction],
    range: &RangeSpec,
    clock: &dyn Clock,
) -> Result<ForecastReport> {
    let date_range = DateRange::resolve(range, clock)?;
    debug!(
        start = %date_range.start,
        end = %date_range.end,
        cutoff = %date_range.cutoff,
        "resolved forecast range"
    );

    let actual = aggregate_actual(
        transactions,
        date_range.start,
        date_range.actual_window_end(),
    );
    let projection = if date_range.is_elapsed() {
        Projection::default()
    } else {
        let categories = CustomerCategoryMap::from_history(transactions);
        project(
            contracts,
            date_range.cutoff,
            date_range.end,
            Some(&categories),
        )
    };

    let monthly_total = MonthlyTotal::from_parts(actual.revenue.total, projection.total);
    let count_status =
        |status: ContractStatus| contracts.iter().filter(|c| c.status == status).count();
    let metrics = ForecastMetrics {
        total_transactions: actual.counts.total,
        approved_transactions: actual.counts.approved,
        declined_transactions: actual.counts.declined,
        active_contracts: count_status(ContractStatus::Active),
        cancelled_contracts: count_status(ContractStatus::Cancelled),
        completed_contracts: count_status(ContractStatus::Completed),
        monthly_recurring_revenue: calculate_total_mrr(contracts),
    };

    Ok(ForecastReport {
        date_range,
        actual_revenue: actual.revenue,
        projected_revenue: ProjectedRevenue {
            total: projection.total,
            contract_count: projection.contract_count,
            upcoming_payments: projection.entries,
        },
        monthly_total,
        metrics,
    })
}
