use std::collections::BTreeMap;

use serde::Serialize;

use crate::billing::Transaction;

/// Category used whenever a customer has no categorized recurring history.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Best-guess product category per customer, by majority vote over recurring history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomerCategoryMap {
    entries: BTreeMap<String, String>,
}

impl CustomerCategoryMap {
    /// Tallies categories per customer in the order the transactions are given.
    ///
    /// Only recurring transactions with both a customer and a category vote. On a
    /// tie the category seen first wins.
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut tallies: BTreeMap<&str, Vec<(&str, u32)>> = BTreeMap::new();
        for txn in transactions.iter().filter(|txn| txn.is_recurring()) {
            let (Some(customer), Some(category)) = (
                txn.customer_name.as_deref(),
                txn.product_category.as_deref(),
            ) else {
                continue;
            };
            let votes = tallies.entry(customer).or_default();
            match votes.iter_mut().find(|(seen, _)| *seen == category) {
                Some((_, count)) => *count += 1,
                None => votes.push((category, 1)),
            }
        }

        let entries = tallies
            .into_iter()
            .filter_map(|(customer, votes)| {
                let mut best: Option<(&str, u32)> = None;
                for (category, count) in votes {
                    if best.map_or(true, |(_, top)| count > top) {
                        best = Some((category, count));
                    }
                }
                best.map(|(category, _)| (customer.to_string(), category.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Builds the map from raw history, most recent transactions first.
    pub fn from_history(transactions: &[Transaction]) -> Self {
        let mut recurring: Vec<Transaction> = transactions
            .iter()
            .filter(|txn| txn.is_recurring() && txn.product_category.is_some())
            .cloned()
            .collect();
        recurring.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Self::build(&recurring)
    }

    pub fn get(&self, customer: &str) -> Option<&str> {
        self.entries.get(customer).map(String::as_str)
    }

    /// Category for `customer`, or [`UNCATEGORIZED`] when unknown.
    pub fn resolve(&self, customer: &str) -> &str {
        self.get(customer).unwrap_or(UNCATEGORIZED)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(customer, category)| (customer.as_str(), category.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomerCategoryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(customer, category)| (customer.into(), category.into()))
                .collect(),
        }
    }
}
