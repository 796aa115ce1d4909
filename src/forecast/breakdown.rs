//! Sparse per-day, per-category accumulation shared by actual and projected revenue.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::time::dates::format_ymd;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownEntry {
    pub category: String,
    pub amount: Decimal,
    pub count: u32,
    pub customers: Vec<String>,
}

/// One calendar day with at least one payment. Empty days are never emitted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyBreakdownEntry {
    pub date: String,
    pub amount: Decimal,
    pub count: u32,
    pub customers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
}

#[derive(Debug, Default)]
struct Tally {
    amount: Decimal,
    count: u32,
    customers: BTreeSet<String>,
}

impl Tally {
    fn add(&mut self, amount: Decimal, customer: Option<&str>) {
        self.amount = self.amount.saturating_add(amount);
        self.count += 1;
        if let Some(name) = customer.map(str::trim).filter(|name| !name.is_empty()) {
            self.customers.insert(name.to_string());
        }
    }
}

#[derive(Debug, Default)]
struct DayTally {
    totals: Tally,
    // First-seen order; reordered by amount only when the day is emitted.
    categories: Vec<(String, Tally)>,
}

#[derive(Debug, Default)]
pub struct DayBuckets {
    days: BTreeMap<NaiveDate, DayTally>,
}

impl DayBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one payment to its day. `category` is `None` for the category-less variant.
    pub fn record(
        &mut self,
        date: NaiveDate,
        amount: Decimal,
        customer: Option<&str>,
        category: Option<&str>,
    ) {
        let day = self.days.entry(date).or_default();
        day.totals.add(amount, customer);
        if let Some(category) = category {
            let slot = match day.categories.iter().position(|(name, _)| name == category) {
                Some(idx) => idx,
                None => {
                    day.categories.push((category.to_string(), Tally::default()));
                    day.categories.len() - 1
                }
            };
            day.categories[slot].1.add(amount, customer);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn total(&self) -> Decimal {
        self.days
            .values()
            .fold(Decimal::ZERO, |acc, day| acc.saturating_add(day.totals.amount))
    }

    /// Days ascending; categories within a day descending by amount.
    pub fn into_entries(self) -> Vec<DailyBreakdownEntry> {
        self.days
            .into_iter()
            .map(|(date, day)| {
                let mut category_breakdown: Vec<CategoryBreakdownEntry> = day
                    .categories
                    .into_iter()
                    .map(|(category, tally)| CategoryBreakdownEntry {
                        category,
                        amount: tally.amount,
                        count: tally.count,
                        customers: tally.customers.into_iter().collect(),
                    })
                    .collect();
                category_breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
                DailyBreakdownEntry {
                    date: format_ymd(date),
                    amount: day.totals.amount,
                    count: day.totals.count,
                    customers: day.totals.customers.into_iter().collect(),
                    category_breakdown,
                }
            })
            .collect()
    }
}
