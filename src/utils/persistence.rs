use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    billing::{Contract, ContractRecord, Transaction, TransactionRecord},
    errors::{ForecastError, SnapshotError},
    forecast::{generate_forecast, ForecastReport, RangeSpec},
    time::Clock,
};

/// On-disk shape of a tenant snapshot, as exported by the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub contracts: Vec<ContractRecord>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// Typed contracts and transactions, parsed once and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub contracts: Vec<Contract>,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn forecast(&self, range: &RangeSpec, clock: &dyn Clock) -> Result<ForecastReport, ForecastError> {
        generate_forecast(&self.contracts, &self.transactions, range, clock)
    }
}

impl TryFrom<SnapshotDocument> for Snapshot {
    type Error = ForecastError;

    fn try_from(document: SnapshotDocument) -> Result<Self, Self::Error> {
        let contracts = document
            .contracts
            .into_iter()
            .map(Contract::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let transactions = document
            .transactions
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            contracts,
            transactions,
        })
    }
}

pub fn parse_snapshot(json: &str) -> Result<Snapshot, SnapshotError> {
    let document: SnapshotDocument = serde_json::from_str(json)?;
    let snapshot = Snapshot::try_from(document)?;
    tracing::debug!(
        contracts = snapshot.contracts.len(),
        transactions = snapshot.transactions.len(),
        "parsed snapshot"
    );
    Ok(snapshot)
}

/// Loads and parses a snapshot file, returning structured errors on failure.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let data = fs::read_to_string(path)?;
    parse_snapshot(&data)
}

/// Writes a snapshot document atomically by staging to a temporary file.
pub fn save_snapshot(document: &SnapshotDocument, path: &Path) -> Result<(), SnapshotError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(document)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}
