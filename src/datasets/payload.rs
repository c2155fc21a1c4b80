use std::collections::BTreeMap;

use serde::Serialize;

/// Label/value line chart (hourly consumption).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Actual-vs-predicted series with optional confidence bounds. The bound
/// fields are whole-array options: a missing source column serializes as a
/// null array, never an omitted key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPayload {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
    pub lower_bound: Option<Vec<Option<f64>>>,
    pub upper_bound: Option<Vec<Option<f64>>>,
}

/// Prophet component decomposition: trend required, seasonal terms optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsPayload {
    pub labels: Vec<String>,
    pub trend: Vec<Option<f64>>,
    pub weekly: Option<Vec<Option<f64>>>,
    pub yearly: Option<Vec<Option<f64>>>,
}

/// Timeline with anomaly markers: `anomaly_points` carries the actual value
/// at flagged indices and null elsewhere, so both series stay parallel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyPayload {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub anomaly_points: Vec<Option<f64>>,
}

/// Residual histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramPayload {
    pub labels: Vec<String>,
    pub frequency: Vec<f64>,
}

/// Power-vs-temperature scatter sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPayload {
    pub temperature: Vec<f64>,
    pub power: Vec<f64>,
}

/// Scalar model/KPI metrics from the single-row metrics file. Every field is
/// nullable; an absent column or unparsable cell is null, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    pub lstm_mae: Option<f64>,
    pub lstm_rmse: Option<f64>,
    pub anomalies_count: Option<i64>,
    pub residual_mean: Option<f64>,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub anomaly_threshold: Option<f64>,
    pub total_samples: Option<i64>,
    pub anomaly_rate_pct: Option<f64>,
    pub residual_min: Option<f64>,
    pub residual_max: Option<f64>,
    pub residual_median: Option<f64>,
    pub residual_std: Option<f64>,
}

/// One row of the scrollable anomaly table, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyEntry {
    pub timestamp: String,
    pub residual: Option<f64>,
    pub actual: Option<f64>,
    pub pred: Option<f64>,
}

/// Weekday-vs-weekend bars; the extractor does not aggregate, it only
/// mirrors the label/value rows the pipeline already grouped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayWeekendPayload {
    pub labels: Vec<String>,
    pub power: Vec<Option<f64>>,
}

/// Correlation heatmap: square matrix aligned 1:1 with labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPayload {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// 24-hour rolling mean/std overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingPayload {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub rolling_mean: Option<Vec<Option<f64>>>,
    pub rolling_std: Option<Vec<Option<f64>>>,
}

/// The primary dashboard forecast: fully-populated parallel arrays with
/// synthetic bounds when the source file carries none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandedForecastPayload {
    pub labels: Vec<String>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub lower_bound: Vec<f64>,
}

/// Raw forecast-table rows: values left as strings, no numeric coercion.
pub type TableRows = Vec<BTreeMap<String, String>>;
