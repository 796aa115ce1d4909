//! Contract and payment models plus the schedule and MRR math over them.

pub mod contract;
pub mod mrr;
pub mod schedule;
pub mod transaction;

pub use contract::{Contract, ContractRecord, ContractStatus};
pub use mrr::{calculate_mrr, calculate_total_mrr, payments_per_month, WEEKS_PER_MONTH};
pub use schedule::{occurrences, BillingSchedule};
pub use transaction::{
    Transaction, TransactionKind, TransactionRecord, TransactionStatus, RECURRING_SOURCE,
};
