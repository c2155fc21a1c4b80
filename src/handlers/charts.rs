use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::datasets::{
    anomaly_list, anomaly_timeline, correlation_matrix, forecast_output_forecast, forecast_table,
    hourly_load_profile, hourly_series, metrics_summary, predicted_results_forecast,
    prophet_components, prophet_forecast, read_table, residual_distribution, rolling_stats,
    scatter_sample, weekday_weekend, AnomalyEntry, AnomalyPayload, BandedForecastPayload,
    ComponentsPayload, CorrelationPayload, Extracted, ForecastPayload, HistogramPayload,
    MetricsPayload, RollingPayload, ScatterPayload, SeriesPayload, Table, WeekdayWeekendPayload,
};
use crate::state::ServerState;

use super::auth::MsgResponse;

// File names the analytics pipeline writes into the data directory. Each is
// independently optional.
const HOURLY_CONSUMPTION: &str = "hourly_consumption.csv";
const PROPHET_FORECAST: &str = "prophet_forecast.csv";
const PROPHET_COMPONENTS: &str = "prophet_components.csv";
const ANOMALY_TIMELINE: &str = "anomaly_timeline.csv";
const RESIDUAL_DISTRIBUTION: &str = "residual_distribution.csv";
const POWER_VS_TEMPERATURE: &str = "power_vs_temperature.csv";
const METRICS: &str = "metrics.csv";
const ANOMALY_LIST: &str = "anomaly_list.csv";
const HOURLY_LOAD_PROFILE: &str = "hourly_load_profile.csv";
const WEEKDAY_WEEKEND: &str = "weekday_weekend.csv";
const FORECAST_TABLE: &str = "forecast_table.csv";
const CORRELATION_MATRIX: &str = "correlation_matrix.csv";
const ROLLING_24H: &str = "rolling_24h.csv";
const PREDICTED_RESULTS: &str = "predicted_results.csv";
const FORECAST_OUTPUT: &str = "forecast_output.csv";

/// Aggregated chart data for the dashboard. Every field carries the payload
/// when its dataset could be produced and null otherwise -- a key is never
/// omitted and an unavailable dataset is never an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsResponse {
    pub hourly: Option<SeriesPayload>,
    pub prophet_forecast: Option<ForecastPayload>,
    pub prophet_components: Option<ComponentsPayload>,
    pub anomaly: Option<AnomalyPayload>,
    pub lstm: Option<BandedForecastPayload>,
    pub residual_distribution: Option<HistogramPayload>,
    pub power_vs_temp: Option<ScatterPayload>,
    pub rolling_24h: Option<RollingPayload>,
    pub metrics: Option<MetricsPayload>,
    pub anomaly_list: Option<Vec<AnomalyEntry>>,
    pub hourly_load_profile: Option<Vec<Option<f64>>>,
    pub weekday_weekend: Option<WeekdayWeekendPayload>,
    pub forecast_table: Option<crate::datasets::TableRows>,
    pub correlation_matrix: Option<CorrelationPayload>,
}

/// Read one file and run its extractor; any Unavailable leg yields None.
async fn extracted<T>(
    dir: &Path,
    file: &str,
    extractor: impl FnOnce(&Table) -> Extracted<T>,
) -> Option<T> {
    let table = read_table(dir, file).await.ok()?;
    extractor(&table).ok()
}

/// The primary forecast: LSTM predicted-results first, Prophet output as
/// the fallback.
async fn banded_forecast(dir: &Path) -> Option<BandedForecastPayload> {
    if let Some(payload) = extracted(dir, PREDICTED_RESULTS, predicted_results_forecast).await {
        return Some(payload);
    }
    extracted(dir, FORECAST_OUTPUT, forecast_output_forecast).await
}

/// GET /routes/ml/charts - every dashboard dataset in one response.
pub async fn get_charts(State(state): State<Arc<ServerState>>) -> Json<ChartsResponse> {
    let dir = state.config.data_directory.as_path();
    Json(ChartsResponse {
        hourly: extracted(dir, HOURLY_CONSUMPTION, hourly_series).await,
        prophet_forecast: extracted(dir, PROPHET_FORECAST, prophet_forecast).await,
        prophet_components: extracted(dir, PROPHET_COMPONENTS, prophet_components).await,
        anomaly: extracted(dir, ANOMALY_TIMELINE, anomaly_timeline).await,
        lstm: banded_forecast(dir).await,
        residual_distribution: extracted(dir, RESIDUAL_DISTRIBUTION, residual_distribution).await,
        power_vs_temp: extracted(dir, POWER_VS_TEMPERATURE, scatter_sample).await,
        rolling_24h: extracted(dir, ROLLING_24H, rolling_stats).await,
        metrics: extracted(dir, METRICS, metrics_summary).await,
        anomaly_list: extracted(dir, ANOMALY_LIST, anomaly_list).await,
        hourly_load_profile: extracted(dir, HOURLY_LOAD_PROFILE, hourly_load_profile).await,
        weekday_weekend: extracted(dir, WEEKDAY_WEEKEND, weekday_weekend).await,
        forecast_table: extracted(dir, FORECAST_TABLE, forecast_table).await,
        correlation_matrix: extracted(dir, CORRELATION_MATRIX, correlation_matrix).await,
    })
}

/// GET /routes/ml/forecast - the primary forecast alone. Unlike the bulk
/// endpoint, having no forecast at all is a distinct 404 condition.
pub async fn get_forecast(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<BandedForecastPayload>, (StatusCode, Json<MsgResponse>)> {
    match banded_forecast(state.config.data_directory.as_path()).await {
        Some(payload) => Ok(Json(payload)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(MsgResponse {
                msg: "No forecast data found. Run the analysis pipeline to generate \
                      predicted_results.csv or forecast_output.csv."
                    .to_string(),
            }),
        )),
    }
}
