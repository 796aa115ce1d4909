#![allow(dead_code)]

use chrono::NaiveDate;
use forecast_core::billing::{
    BillingSchedule, Contract, ContractStatus, Transaction, TransactionKind, TransactionStatus,
    RECURRING_SOURCE,
};
use rust_decimal::Decimal;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

pub fn contract(
    customer: &str,
    amount: Decimal,
    schedule: BillingSchedule,
    next_bill_date: NaiveDate,
    status: ContractStatus,
) -> Contract {
    Contract::new(customer, amount, schedule, Some(next_bill_date), status)
}

pub fn sale(amount: Decimal, status: TransactionStatus, date: NaiveDate) -> Transaction {
    Transaction::new(amount, status, TransactionKind::Sale, date)
}

pub fn refund(amount: Decimal, date: NaiveDate) -> Transaction {
    Transaction::new(amount, TransactionStatus::Approved, TransactionKind::Return, date)
}

pub fn recurring_sale(customer: &str, category: &str, amount: Decimal, date: NaiveDate) -> Transaction {
    sale(amount, TransactionStatus::Settled, date)
        .with_source(RECURRING_SOURCE)
        .with_customer(customer)
        .with_category(category)
}

/// Snapshot document used by the file-based tests; "today" is 2025-01-15.
pub const SAMPLE_SNAPSHOT: &str = r#"{
  "contracts": [
    {
      "id": "c-acme",
      "amount": 100,
      "billingInterval": "Monthly",
      "billingFrequency": "1 Month",
      "nextBillDate": "2025-01-20T00:00:00Z",
      "status": "Active",
      "customerName": "Acme"
    },
    {
      "id": "c-beta",
      "amount": "25.00",
      "billingInterval": "Weekly",
      "billingFrequency": "1 Week",
      "nextBillDate": "2025-01-15 00:00:00+00",
      "status": "Active",
      "customerName": "Beta"
    },
    {
      "id": "c-old",
      "amount": 60,
      "billingInterval": "Monthly",
      "billingFrequency": "1 Month",
      "nextBillDate": "2025-01-18",
      "status": "Cancelled",
      "customerName": "Old Co"
    }
  ],
  "transactions": [
    {
      "amount": 100,
      "status": "Approved",
      "type": "Sale",
      "source": "Recurring",
      "transactionDate": "2025-01-02T09:15:00Z",
      "customerName": "Acme",
      "productCategory": "Hosting"
    },
    {
      "amount": -20,
      "status": "Approved",
      "type": "Return",
      "transactionDate": "2025-01-03",
      "customerName": "Acme"
    },
    {
      "amount": 500,
      "status": "Declined",
      "type": "Sale",
      "transactionDate": "2025-01-05"
    }
  ]
}"#;
