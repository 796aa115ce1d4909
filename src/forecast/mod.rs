//! Actual, projected and blended revenue reporting.

pub mod actual;
pub mod breakdown;
pub mod categories;
pub mod projection;
pub mod range;
pub mod report;

pub use actual::{aggregate_actual, ActualAggregation, ActualRevenue, TransactionCounts};
pub use breakdown::{CategoryBreakdownEntry, DailyBreakdownEntry};
pub use categories::{CustomerCategoryMap, UNCATEGORIZED};
pub use projection::{
    calculate_projected_revenue, generate_projections, generate_projections_with_categories,
    project, DailyProjectionEntry, Projection,
};
pub use range::{DateRange, Preset, RangeSpec};
pub use report::{
    generate_forecast, ForecastMetrics, ForecastReport, MonthlyTotal, ProjectedRevenue,
};
