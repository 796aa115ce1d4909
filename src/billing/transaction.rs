use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};
use crate::time::dates::parse_utc;

/// Source tag that marks a transaction as produced by a recurring contract.
pub const RECURRING_SOURCE: &str = "Recurring";

/// Payment event as it arrives from storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub transaction_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Approved,
    Settled,
    Declined,
    Other(String),
}

impl TransactionStatus {
    /// Approved and settled payments count as collected revenue.
    pub fn is_realized(&self) -> bool {
        matches!(self, TransactionStatus::Approved | TransactionStatus::Settled)
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => TransactionStatus::Approved,
            "settled" => TransactionStatus::Settled,
            "declined" => TransactionStatus::Declined,
            _ => TransactionStatus::Other(value.trim().to_string()),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Approved => f.write_str("Approved"),
            TransactionStatus::Settled => f.write_str("Settled"),
            TransactionStatus::Declined => f.write_str("Declined"),
            TransactionStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// Returns are identified by their type tag, never by the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Sale,
    Return,
}

impl TransactionKind {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(raw) if raw.trim().eq_ignore_ascii_case("return") => TransactionKind::Return,
            _ => TransactionKind::Sale,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub kind: TransactionKind,
    pub source: Option<String>,
    pub transaction_date: NaiveDate,
    pub customer_name: Option<String>,
    pub product_category: Option<String>,
}

impl Transaction {
    pub fn new(
        amount: Decimal,
        status: TransactionStatus,
        kind: TransactionKind,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            amount,
            status,
            kind,
            source: None,
            transaction_date,
            customer_name: None,
            product_category: None,
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer_name = Some(customer.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = Some(category.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_return(&self) -> bool {
        self.kind == TransactionKind::Return
    }

    pub fn is_recurring(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| source.trim().eq_ignore_ascii_case(RECURRING_SOURCE))
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ForecastError;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        Ok(Self {
            id: record.id,
            amount: record.amount,
            status: TransactionStatus::from(record.status),
            kind: TransactionKind::from_tag(record.kind.as_deref()),
            source: record.source,
            transaction_date: parse_utc(&record.transaction_date)?,
            customer_name: non_blank(record.customer_name),
            product_category: non_blank(record.product_category),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
