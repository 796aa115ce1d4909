#![doc(test(attr(deny(warnings))))]

//! Forecast Core turns snapshots of recurring-billing contracts and historical
//! payments into revenue reports: collected revenue up to a cutoff day, projected
//! revenue after it, and the blend of the two.

pub mod billing;
pub mod cli;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod time;
pub mod utils;

use std::sync::Once;

pub use billing::{Contract, Transaction};
pub use errors::{ForecastError, SnapshotError};
pub use forecast::{generate_forecast, ForecastReport, RangeSpec};
pub use time::{Clock, FixedClock, SystemClock};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Forecast Core tracing initialized.");
    });
}
