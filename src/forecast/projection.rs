//! Projects contract schedules into sparse day buckets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::breakdown::{DailyBreakdownEntry, DayBuckets};
use super::categories::CustomerCategoryMap;
use crate::billing::{occurrences, BillingSchedule, Contract};

pub type DailyProjectionEntry = DailyBreakdownEntry;

/// Projection over one window, with the number of contracts that billed in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub total: Decimal,
    pub contract_count: usize,
    pub entries: Vec<DailyProjectionEntry>,
}

/// Day-bucketed projection without category attribution.
pub fn generate_projections(
    contracts: &[Contract],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<DailyProjectionEntry> {
    project(contracts, window_start, window_end, None).entries
}

/// Day-bucketed projection where each occurrence is attributed to the customer's category.
pub fn generate_projections_with_categories(
    contracts: &[Contract],
    window_start: NaiveDate,
    window_end: NaiveDate,
    categories: &CustomerCategoryMap,
) -> Vec<DailyProjectionEntry> {
    project(contracts, window_start, window_end, Some(categories)).entries
}

/// Sum of every occurrence amount in the window, without bucketing.
pub fn calculate_projected_revenue(
    contracts: &[Contract],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Decimal {
    contracts
        .iter()
        .map(|contract| {
            let hits = occurrences(contract, window_start, window_end).len();
            contract.amount.saturating_mul(Decimal::from(hits))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn project(
    contracts: &[Contract],
    window_start: NaiveDate,
    window_end: NaiveDate,
    categories: Option<&CustomerCategoryMap>,
) -> Projection {
    let mut buckets = DayBuckets::new();
    let mut contract_count = 0usize;

    for contract in contracts {
        let dates = occurrences(contract, window_start, window_end);
        if dates.is_empty() {
            trace_skipped(contract);
            continue;
        }
        contract_count += 1;
        let customer = contract.customer_name.as_str();
        let category = categories.map(|map| map.resolve(customer));
        for date in dates {
            buckets.record(date, contract.amount, Some(customer), category);
        }
    }

    let total = buckets.total();
    debug!(
        start = %window_start,
        end = %window_end,
        contracts = contract_count,
        days = buckets.len(),
        %total,
        "projected contract revenue"
    );

    Projection {
        total,
        contract_count,
        entries: buckets.into_entries(),
    }
}

fn trace_skipped(contract: &Contract) {
    let reason = if !contract.is_active() {
        "inactive"
    } else if contract.next_bill_date.is_none() {
        "no next bill date"
    } else if contract.schedule == BillingSchedule::Unrecognized {
        "unrecognized schedule"
    } else {
        "no occurrence in window"
    };
    trace!(
        customer = %contract.customer_name,
        status = %contract.status,
        reason,
        "contract contributes nothing to projection"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::ContractStatus;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active(customer: &str, amount: Decimal, schedule: BillingSchedule, next: NaiveDate) -> Contract {
        Contract::new(customer, amount, schedule, Some(next), ContractStatus::Active)
    }

    #[test]
    fn buckets_share_days_across_contracts() {
        let contracts = vec![
            active(
                "Acme",
                dec!(100),
                BillingSchedule::Monthly { step_months: 1 },
                ymd(2025, 1, 15),
            ),
            active(
                "Acme",
                dec!(20),
                BillingSchedule::Weekly { step_weeks: 1 },
                ymd(2025, 1, 1),
            ),
        ];
        let entries = generate_projections(&contracts, ymd(2025, 1, 1), ymd(2025, 1, 31));
        let jan_15 = entries
            .iter()
            .find(|entry| entry.date == "2025-01-15")
            .expect("shared day");
        assert_eq!(jan_15.amount, dec!(120));
        assert_eq!(jan_15.count, 2);
        assert_eq!(jan_15.customers, vec!["Acme"]);
        assert_eq!(entries.len(), 5);
        assert!(entries.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn inactive_and_undated_contracts_are_skipped() {
        let mut cancelled = active(
            "Gone",
            dec!(10),
            BillingSchedule::Weekly { step_weeks: 1 },
            ymd(2025, 1, 1),
        );
        cancelled.status = ContractStatus::Cancelled;
        let mut undated = active(
            "Later",
            dec!(10),
            BillingSchedule::Weekly { step_weeks: 1 },
            ymd(2025, 1, 1),
        );
        undated.next_bill_date = None;
        let unknown = active("Odd", dec!(10), BillingSchedule::Unrecognized, ymd(2025, 1, 1));

        let projection = project(
            &[cancelled, undated, unknown],
            ymd(2025, 1, 1),
            ymd(2025, 12, 31),
            None,
        );
        assert_eq!(projection.total, Decimal::ZERO);
        assert_eq!(projection.contract_count, 0);
        assert!(projection.entries.is_empty());
    }

    #[test]
    fn category_variant_attributes_by_customer() {
        let contracts = vec![
            active("Acme", dec!(30), BillingSchedule::Once, ymd(2025, 1, 10)),
            active("Beta", dec!(70), BillingSchedule::Once, ymd(2025, 1, 10)),
            active("Gamma", dec!(5), BillingSchedule::Once, ymd(2025, 1, 10)),
        ];
        let map: CustomerCategoryMap = [("Acme", "Hosting"), ("Beta", "Support")]
            .into_iter()
            .collect();
        let entries = generate_projections_with_categories(
            &contracts,
            ymd(2025, 1, 1),
            ymd(2025, 1, 31),
            &map,
        );
        assert_eq!(entries.len(), 1);
        let names: Vec<_> = entries[0]
            .category_breakdown
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        assert_eq!(names, vec!["Support", "Hosting", "Uncategorized"]);
    }

    #[test]
    fn convenience_total_matches_buckets() {
        let contracts = vec![
            active(
                "Acme",
                dec!(19.99),
                BillingSchedule::Weekly { step_weeks: 3 },
                ymd(2024, 12, 2),
            ),
            active(
                "Beta",
                dec!(250),
                BillingSchedule::Monthly { step_months: 2 },
                ymd(2025, 1, 31),
            ),
            active("Gamma", dec!(999), BillingSchedule::Once, ymd(2025, 3, 3)),
        ];
        let (start, end) = (ymd(2025, 1, 1), ymd(2025, 6, 30));
        let projection = project(&contracts, start, end, None);
        assert_eq!(
            calculate_projected_revenue(&contracts, start, end),
            projection.total
        );
        let bucket_sum: Decimal = projection.entries.iter().map(|entry| entry.amount).sum();
        assert_eq!(bucket_sum, projection.total);
        assert_eq!(projection.contract_count, 3);
    }
}
