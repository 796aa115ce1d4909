use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::BillingSchedule;
use crate::errors::{ForecastError, Result};
use crate::time::dates::parse_utc;

/// Contract as it arrives from storage: loosely typed, camelCase fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub billing_interval: String,
    #[serde(default)]
    pub billing_frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_bill_date: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractStatus {
    Active,
    Completed,
    Cancelled,
    Inactive,
    Other(String),
}

impl From<&str> for ContractStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => ContractStatus::Active,
            "completed" => ContractStatus::Completed,
            "cancelled" | "canceled" => ContractStatus::Cancelled,
            "inactive" => ContractStatus::Inactive,
            _ => ContractStatus::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for ContractStatus {
    fn from(value: String) -> Self {
        ContractStatus::from(value.as_str())
    }
}

impl From<ContractStatus> for String {
    fn from(status: ContractStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Active => f.write_str("Active"),
            ContractStatus::Completed => f.write_str("Completed"),
            ContractStatus::Cancelled => f.write_str("Cancelled"),
            ContractStatus::Inactive => f.write_str("Inactive"),
            ContractStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// A recurring billing agreement with its schedule already interpreted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_name: String,
    pub amount: Decimal,
    pub schedule: BillingSchedule,
    pub next_bill_date: Option<NaiveDate>,
    pub status: ContractStatus,
}

impl Contract {
    pub fn new(
        customer_name: impl Into<String>,
        amount: Decimal,
        schedule: BillingSchedule,
        next_bill_date: Option<NaiveDate>,
        status: ContractStatus,
    ) -> Self {
        Self {
            id: None,
            customer_name: customer_name.into(),
            amount,
            schedule,
            next_bill_date,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}

impl TryFrom<ContractRecord> for Contract {
    type Error = ForecastError;

    fn try_from(record: ContractRecord) -> Result<Self> {
        let next_bill_date = record
            .next_bill_date
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_utc)
            .transpose()?;
        Ok(Self {
            id: record.id,
            schedule: BillingSchedule::parse(&record.billing_interval, &record.billing_frequency),
            customer_name: record.customer_name,
            amount: record.amount,
            next_bill_date,
            status: ContractStatus::from(record.status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(json: &str) -> ContractRecord {
        serde_json::from_str(json).expect("valid contract json")
    }

    #[test]
    fn converts_record_into_typed_contract() {
        let contract = Contract::try_from(record(
            r#"{
                "id": "c-1",
                "amount": 49.99,
                "billingInterval": "Weekly",
                "billingFrequency": "2 Weeks",
                "nextBillDate": "2025-01-15T00:00:00Z",
                "status": "Active",
                "customerName": "Acme"
            }"#,
        ))
        .expect("convert");
        assert_eq!(contract.amount, dec!(49.99));
        assert_eq!(contract.schedule, BillingSchedule::Weekly { step_weeks: 2 });
        assert_eq!(
            contract.next_bill_date,
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert!(contract.is_active());
    }

    #[test]
    fn missing_or_blank_next_bill_date_is_none() {
        let contract = Contract::try_from(record(
            r#"{"amount": "10", "status": "Active", "nextBillDate": "  "}"#,
        ))
        .expect("convert");
        assert_eq!(contract.next_bill_date, None);
        assert_eq!(contract.schedule, BillingSchedule::Unrecognized);
    }

    #[test]
    fn malformed_next_bill_date_is_rejected() {
        let err = Contract::try_from(record(
            r#"{"amount": 10, "status": "Active", "nextBillDate": "15/01/2025"}"#,
        ))
        .expect_err("bad date");
        assert_eq!(err, ForecastError::InvalidDateFormat("15/01/2025".into()));
    }

    #[test]
    fn status_parsing_tolerates_unknown_values() {
        assert_eq!(ContractStatus::from("canceled"), ContractStatus::Cancelled);
        assert_eq!(ContractStatus::from(" ACTIVE "), ContractStatus::Active);
        assert_eq!(
            ContractStatus::from("Paused"),
            ContractStatus::Other("Paused".into())
        );
        assert_eq!(String::from(ContractStatus::Completed), "Completed");
    }
}
