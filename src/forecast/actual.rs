//! Realized revenue over the half-open window `[start, cutoff)`.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use super::breakdown::{DailyBreakdownEntry, DayBuckets};
use super::categories::UNCATEGORIZED;
use crate::billing::{Transaction, TransactionStatus};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActualRevenue {
    pub total: Decimal,
    pub transaction_count: u32,
    pub average_transaction: Decimal,
    pub daily_breakdown: Vec<DailyBreakdownEntry>,
}

/// Status counts for every transaction dated inside the window.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCounts {
    pub total: u32,
    pub approved: u32,
    pub declined: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualAggregation {
    pub revenue: ActualRevenue,
    pub counts: TransactionCounts,
}

/// Sums approved and settled transactions dated in `[window_start, cutoff)`.
///
/// Sales add their amount; returns (by type tag) subtract their absolute amount.
/// Declined transactions are only counted.
pub fn aggregate_actual(
    transactions: &[Transaction],
    window_start: NaiveDate,
    cutoff: NaiveDate,
) -> ActualAggregation {
    let mut buckets = DayBuckets::new();
    let mut counts = TransactionCounts::default();
    let mut sales_total = Decimal::ZERO;
    let mut sales_count = 0u32;
    let mut returns_total = Decimal::ZERO;

    let in_window = transactions
        .iter()
        .filter(|txn| txn.transaction_date >= window_start && txn.transaction_date < cutoff);
    for txn in in_window {
        counts.total += 1;
        if txn.status == TransactionStatus::Declined {
            counts.declined += 1;
            continue;
        }
        if !txn.status.is_realized() {
            continue;
        }
        counts.approved += 1;
        let signed = if txn.is_return() {
            returns_total = returns_total.saturating_add(txn.amount.abs());
            -txn.amount.abs()
        } else {
            sales_total = sales_total.saturating_add(txn.amount);
            sales_count += 1;
            txn.amount
        };
        let category = txn.product_category.as_deref().unwrap_or(UNCATEGORIZED);
        buckets.record(
            txn.transaction_date,
            signed,
            txn.customer_name.as_deref(),
            Some(category),
        );
    }

    let total = sales_total.saturating_sub(returns_total);
    let average_transaction = if sales_count == 0 {
        Decimal::ZERO
    } else {
        (sales_total / Decimal::from(sales_count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    debug!(
        start = %window_start,
        cutoff = %cutoff,
        realized = counts.approved,
        declined = counts.declined,
        %total,
        "aggregated actual revenue"
    );

    ActualAggregation {
        revenue: ActualRevenue {
            total,
            transaction_count: counts.approved,
            average_transaction,
            daily_breakdown: buckets.into_entries(),
        },
        counts,
    }
}
