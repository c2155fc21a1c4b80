//! Tabular data extraction for the dashboard.
//!
//! The analytics pipeline drops loosely-structured CSV files into one
//! directory; this module reads them, locates the relevant columns by a
//! declarative rule table, and reshapes the rows into chart payloads. Every
//! file is optional: a missing file, a missing column, or a shape the
//! extractor cannot vouch for all collapse into [`Unavailable`], which the
//! aggregation endpoint renders as a JSON null.

mod extract;
mod payload;
mod resolve;
mod table;

pub use extract::{
    anomaly_list, anomaly_timeline, correlation_matrix, forecast_output_forecast, forecast_table,
    hourly_load_profile, hourly_series, metrics_summary, predicted_results_forecast,
    prophet_components, prophet_forecast, residual_distribution, rolling_stats, scatter_sample,
    weekday_weekend,
};
pub use payload::{
    AnomalyEntry, AnomalyPayload, BandedForecastPayload, ComponentsPayload, CorrelationPayload,
    ForecastPayload, HistogramPayload, MetricsPayload, RollingPayload, ScatterPayload,
    SeriesPayload, TableRows, WeekdayWeekendPayload,
};
pub use resolve::{resolve_column, ColumnRule};
pub use table::{read_table, Table};

/// A dataset that cannot be produced. Not an error: the upstream pipeline
/// writes each file independently, so absence is an expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailable;

/// Result of one extraction attempt.
pub type Extracted<T> = Result<T, Unavailable>;
