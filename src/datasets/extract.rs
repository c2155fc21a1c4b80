//! Per-dataset extractors: one pure function per chart, each composing the
//! column rule tables with a row window and the shared rounding policy.
//!
//! Shared policy: numeric cells round to 2 decimal places; a cell that fails
//! to parse becomes null in its positional slot rather than aborting the
//! extraction, except where an extractor explicitly refuses misaligned
//! parallel arrays. Date cells that do not parse pass through as raw text.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use super::payload::{
    AnomalyEntry, AnomalyPayload, BandedForecastPayload, ComponentsPayload, CorrelationPayload,
    ForecastPayload, HistogramPayload, MetricsPayload, RollingPayload, ScatterPayload,
    SeriesPayload, TableRows, WeekdayWeekendPayload,
};
use super::resolve::{resolve_column, ColumnRule};
use super::table::Table;
use super::{Extracted, Unavailable};

use ColumnRule::{Exact, Pattern, PatternExcluding};

// Column rule tables, one per semantic field. Ordered: exact names first,
// then patterns, resolved strategy-major by `resolve_column`.
const DATE_LIKE: &[ColumnRule] = &[Pattern("date|datetime|ds")];
const POWER_OR_TARGET: &[ColumnRule] = &[Pattern("power|global|y")];
const DS: &[ColumnRule] = &[Exact("ds"), Pattern("ds")];
const DS_EXACT: &[ColumnRule] = &[Exact("ds")];
const DS_OR_DATE: &[ColumnRule] = &[Exact("ds"), Pattern("date")];
const ACTUAL_EXACT: &[ColumnRule] = &[Exact("y"), Exact("actual")];
const YHAT: &[ColumnRule] = &[Exact("yhat")];
const LOWER: &[ColumnRule] = &[Pattern("lower")];
const UPPER: &[ColumnRule] = &[Pattern("upper")];
const TREND: &[ColumnRule] = &[Pattern("trend")];
const WEEKLY: &[ColumnRule] = &[Pattern("weekly")];
const YEARLY: &[ColumnRule] = &[Pattern("yearly")];
const Y_EXACT: &[ColumnRule] = &[Exact("y")];
const ANOMALY_FLAG: &[ColumnRule] = &[Pattern("anomaly")];
const BIN: &[ColumnRule] = &[Pattern("bin|center")];
const FREQUENCY: &[ColumnRule] = &[Pattern("freq")];
const TEMPERATURE: &[ColumnRule] = &[Pattern("temp")];
const POWER_OR_GLOBAL: &[ColumnRule] = &[Pattern("power|global")];
const TIMESTAMP: &[ColumnRule] = &[Pattern("timestamp|ds")];
const RESIDUAL: &[ColumnRule] = &[Pattern("residual")];
const ACTUAL_OR_Y: &[ColumnRule] = &[Pattern("actual"), Exact("y")];
const PRED: &[ColumnRule] = &[Pattern("pred")];
const POWER: &[ColumnRule] = &[Pattern("power")];
const LABEL: &[ColumnRule] = &[Pattern("label")];
const ACTUAL: &[ColumnRule] = &[Pattern("actual")];
const PREDICTED: &[ColumnRule] = &[Pattern("predicted")];
const ROLLING_MEAN: &[ColumnRule] = &[Pattern("rolling_mean|mean")];
const ROLLING_STD: &[ColumnRule] = &[Pattern("rolling_std|std")];
const YHAT_ONLY: &[ColumnRule] = &[PatternExcluding("yhat", "lower|upper")];
const YHAT_LOWER: &[ColumnRule] = &[Pattern("yhat_lower|lower")];
const YHAT_UPPER: &[ColumnRule] = &[Pattern("yhat_upper|upper")];

// Metric names resolve with exact rules for the short generic names so that
// `mae` never binds to `lstm_mae`.
const M_LSTM_MAE: &[ColumnRule] = &[Pattern("lstm_mae")];
const M_LSTM_RMSE: &[ColumnRule] = &[Pattern("lstm_rmse")];
const M_ANOMALIES_COUNT: &[ColumnRule] = &[Pattern("anomalies_count")];
const M_RESIDUAL_MEAN: &[ColumnRule] = &[Pattern("residual_mean")];
const M_MAE: &[ColumnRule] = &[Exact("mae")];
const M_RMSE: &[ColumnRule] = &[Exact("rmse")];
const M_ANOMALY_THRESHOLD: &[ColumnRule] = &[Pattern("anomaly_threshold")];
const M_TOTAL_SAMPLES: &[ColumnRule] = &[Pattern("total_samples")];
const M_ANOMALY_RATE: &[ColumnRule] = &[Pattern("anomaly_rate")];
const M_RESIDUAL_MIN: &[ColumnRule] = &[Pattern("residual_min")];
const M_RESIDUAL_MAX: &[ColumnRule] = &[Pattern("residual_max")];
const M_RESIDUAL_MEDIAN: &[ColumnRule] = &[Pattern("residual_median")];
const M_RESIDUAL_STD: &[ColumnRule] = &[Pattern("residual_std")];

/// Round to 2 decimal places. Idempotent on already-rounded values.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn parse_num(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounded nullable numeric cell.
fn num_cell(raw: &str) -> Option<f64> {
    parse_num(raw).map(round2)
}

fn numeric_column(rows: &[Vec<String>], idx: usize) -> Vec<Option<f64>> {
    rows.iter().map(|r| num_cell(&r[idx])).collect()
}

fn optional_column(rows: &[Vec<String>], idx: Option<usize>) -> Option<Vec<Option<f64>>> {
    idx.map(|i| numeric_column(rows, i))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// "Jan 1", or the raw cell when it does not parse as a date.
fn day_label(raw: &str) -> String {
    let raw = raw.trim();
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d").to_string(),
        None => raw.to_string(),
    }
}

/// "Jan 1, 01 PM" for hour-resolution charts.
fn hour_label(raw: &str) -> String {
    let raw = raw.trim();
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %I %p").to_string(),
        None => raw.to_string(),
    }
}

/// Hourly power consumption, last 200 points.
pub fn hourly_series(table: &Table) -> Extracted<SeriesPayload> {
    let date = resolve_column(table.headers(), DATE_LIKE).ok_or(Unavailable)?;
    let power = resolve_column(table.headers(), POWER_OR_TARGET).ok_or(Unavailable)?;
    let rows = table.tail(200);
    let labels: Vec<String> = rows.iter().map(|r| hour_label(&r[date])).collect();
    let data: Vec<f64> = rows.iter().filter_map(|r| parse_num(&r[power])).collect();
    if labels.len() != data.len() {
        return Err(Unavailable);
    }
    Ok(SeriesPayload { labels, data })
}

/// Prophet forecast, actual vs predicted with confidence bounds, last 150.
pub fn prophet_forecast(table: &Table) -> Extracted<ForecastPayload> {
    let headers = table.headers();
    let ds = resolve_column(headers, DS).ok_or(Unavailable)?;
    let yhat = resolve_column(headers, YHAT).ok_or(Unavailable)?;
    let y = resolve_column(headers, ACTUAL_EXACT);
    let lower = resolve_column(headers, LOWER);
    let upper = resolve_column(headers, UPPER);
    let rows = table.tail(150);
    Ok(ForecastPayload {
        labels: rows.iter().map(|r| day_label(&r[ds])).collect(),
        actual: match y {
            Some(i) => numeric_column(rows, i),
            // No actuals in the file: keep the slot as an all-null series.
            None => vec![None; rows.len()],
        },
        predicted: numeric_column(rows, yhat),
        lower_bound: optional_column(rows, lower),
        upper_bound: optional_column(rows, upper),
    })
}

/// Prophet component decomposition, last 150.
pub fn prophet_components(table: &Table) -> Extracted<ComponentsPayload> {
    let headers = table.headers();
    let ds = resolve_column(headers, DS_EXACT).ok_or(Unavailable)?;
    let trend = resolve_column(headers, TREND).ok_or(Unavailable)?;
    let weekly = resolve_column(headers, WEEKLY);
    let yearly = resolve_column(headers, YEARLY);
    let rows = table.tail(150);
    Ok(ComponentsPayload {
        labels: rows.iter().map(|r| day_label(&r[ds])).collect(),
        trend: numeric_column(rows, trend),
        weekly: optional_column(rows, weekly),
        yearly: optional_column(rows, yearly),
    })
}

/// Anomaly detection timeline, last 200. The flag cell is compared
/// case-insensitively against "true"; flagged indices copy the rounded
/// actual into the marker series.
pub fn anomaly_timeline(table: &Table) -> Extracted<AnomalyPayload> {
    let headers = table.headers();
    let ds = resolve_column(headers, DS_EXACT).ok_or(Unavailable)?;
    let y = resolve_column(headers, Y_EXACT).ok_or(Unavailable)?;
    let flag = resolve_column(headers, ANOMALY_FLAG);
    let rows = table.tail(200);
    let actual = numeric_column(rows, y);
    let anomaly_points = match flag {
        Some(i) => rows
            .iter()
            .zip(&actual)
            .map(|(r, a)| {
                if r[i].eq_ignore_ascii_case("true") {
                    *a
                } else {
                    None
                }
            })
            .collect(),
        None => Vec::new(),
    };
    Ok(AnomalyPayload {
        labels: rows.iter().map(|r| day_label(&r[ds])).collect(),
        actual,
        anomaly_points,
    })
}

/// Residual error distribution. Bin labels are the bin center truncated to
/// an integer string; unparsable bins pass through raw.
pub fn residual_distribution(table: &Table) -> Extracted<HistogramPayload> {
    let headers = table.headers();
    let bin = resolve_column(headers, BIN).ok_or(Unavailable)?;
    let freq = resolve_column(headers, FREQUENCY).ok_or(Unavailable)?;
    let rows = table.rows();
    let labels: Vec<String> = rows
        .iter()
        .map(|r| match parse_num(&r[bin]) {
            Some(v) => format!("{}", v.trunc() as i64),
            None => r[bin].clone(),
        })
        .collect();
    let frequency: Vec<f64> = rows.iter().filter_map(|r| parse_num(&r[freq])).collect();
    if labels.len() != frequency.len() {
        return Err(Unavailable);
    }
    Ok(HistogramPayload { labels, frequency })
}

/// Power vs temperature scatter, last 500 rows. Non-numeric cells are
/// dropped from each axis independently; if that desynchronizes the axes
/// the whole sample is refused.
pub fn scatter_sample(table: &Table) -> Extracted<ScatterPayload> {
    let headers = table.headers();
    let temp = resolve_column(headers, TEMPERATURE).ok_or(Unavailable)?;
    let power = resolve_column(headers, POWER_OR_GLOBAL).ok_or(Unavailable)?;
    let rows = table.tail(500);
    let temperature: Vec<f64> = rows.iter().filter_map(|r| parse_num(&r[temp])).collect();
    let power: Vec<f64> = rows.iter().filter_map(|r| parse_num(&r[power])).collect();
    if temperature.len() != power.len() {
        return Err(Unavailable);
    }
    Ok(ScatterPayload { temperature, power })
}

/// Scalar metrics from the single data row of the metrics file.
pub fn metrics_summary(table: &Table) -> Extracted<MetricsPayload> {
    let row = table.rows().first().ok_or(Unavailable)?;
    let num = |rules: &[ColumnRule]| -> Option<f64> {
        let idx = resolve_column(table.headers(), rules)?;
        parse_num(&row[idx])
    };
    let int = |rules: &[ColumnRule]| num(rules).map(|v| v.round() as i64);
    Ok(MetricsPayload {
        lstm_mae: num(M_LSTM_MAE),
        lstm_rmse: num(M_LSTM_RMSE),
        anomalies_count: int(M_ANOMALIES_COUNT),
        residual_mean: num(M_RESIDUAL_MEAN),
        mae: num(M_MAE),
        rmse: num(M_RMSE),
        anomaly_threshold: num(M_ANOMALY_THRESHOLD),
        total_samples: int(M_TOTAL_SAMPLES),
        anomaly_rate_pct: num(M_ANOMALY_RATE),
        residual_min: num(M_RESIDUAL_MIN),
        residual_max: num(M_RESIDUAL_MAX),
        residual_median: num(M_RESIDUAL_MEDIAN),
        residual_std: num(M_RESIDUAL_STD),
    })
}

/// Anomaly table, first 100 rows in file order. No sorting by severity.
pub fn anomaly_list(table: &Table) -> Extracted<Vec<AnomalyEntry>> {
    let headers = table.headers();
    let ts = resolve_column(headers, TIMESTAMP).ok_or(Unavailable)?;
    let residual = resolve_column(headers, RESIDUAL).ok_or(Unavailable)?;
    let actual = resolve_column(headers, ACTUAL_OR_Y);
    let pred = resolve_column(headers, PRED);
    Ok(table
        .head(100)
        .iter()
        .map(|r| AnomalyEntry {
            timestamp: r[ts].clone(),
            residual: parse_num(&r[residual]),
            actual: actual.and_then(|i| parse_num(&r[i])),
            pred: pred.and_then(|i| parse_num(&r[i])),
        })
        .collect())
}

/// Average load per hour of day. 24 values are expected but any count is
/// returned; the mismatch is surfaced as a warning, not resolved by guess.
pub fn hourly_load_profile(table: &Table) -> Extracted<Vec<Option<f64>>> {
    let power = resolve_column(table.headers(), POWER).ok_or(Unavailable)?;
    let values: Vec<Option<f64>> = table
        .rows()
        .iter()
        .map(|r| parse_num(&r[power]))
        .collect();
    let numeric = values.iter().filter(|v| v.is_some()).count();
    if numeric != 24 {
        warn!(
            "hourly load profile has {} numeric values, expected 24",
            numeric
        );
    }
    Ok(values)
}

/// Weekday vs weekend bars, parallel label/value arrays.
pub fn weekday_weekend(table: &Table) -> Extracted<WeekdayWeekendPayload> {
    let headers = table.headers();
    let label = resolve_column(headers, LABEL).ok_or(Unavailable)?;
    let power = resolve_column(headers, POWER).ok_or(Unavailable)?;
    let rows = table.rows();
    Ok(WeekdayWeekendPayload {
        labels: rows.iter().map(|r| r[label].clone()).collect(),
        power: rows.iter().map(|r| parse_num(&r[power])).collect(),
    })
}

/// Forecast table sample, first 50 rows as raw string mappings.
pub fn forecast_table(table: &Table) -> Extracted<TableRows> {
    Ok(table
        .head(50)
        .iter()
        .map(|row| {
            table
                .headers()
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), row[i].clone()))
                .collect::<BTreeMap<_, _>>()
        })
        .collect())
}

/// Correlation matrix. The first column is stripped as a pandas-style index
/// when its header is empty or contains "unnamed"; each row is truncated to
/// the label count so the matrix stays square with its labels.
pub fn correlation_matrix(table: &Table) -> Extracted<CorrelationPayload> {
    let headers = table.headers();
    let first = headers.first().ok_or(Unavailable)?;
    let has_index = first.is_empty() || first.to_lowercase().contains("unnamed");
    let start = usize::from(has_index);
    let labels: Vec<String> = headers[start..]
        .iter()
        .filter(|h| !h.is_empty())
        .cloned()
        .collect();
    let matrix: Vec<Vec<Option<f64>>> = table
        .rows()
        .iter()
        .map(|row| {
            row[start.min(row.len())..]
                .iter()
                .take(labels.len())
                .map(|v| parse_num(v))
                .collect()
        })
        .collect();
    Ok(CorrelationPayload { labels, matrix })
}

/// 24-hour rolling statistics over the whole file.
pub fn rolling_stats(table: &Table) -> Extracted<RollingPayload> {
    let headers = table.headers();
    let actual = resolve_column(headers, ACTUAL).ok_or(Unavailable)?;
    let ds = resolve_column(headers, DS_OR_DATE);
    let mean = resolve_column(headers, ROLLING_MEAN);
    let std = resolve_column(headers, ROLLING_STD);
    let rows = table.rows();
    Ok(RollingPayload {
        labels: rows
            .iter()
            .map(|r| match ds {
                Some(i) => hour_label(&r[i]),
                None => String::new(),
            })
            .collect(),
        actual: numeric_column(rows, actual),
        rolling_mean: optional_column(rows, mean),
        rolling_std: optional_column(rows, std),
    })
}

/// LSTM actual-vs-predicted forecast. Only rows where both values parse are
/// kept, labelled by 1-based ordinal; the confidence band is a fixed
/// predicted x1.08 / x0.92 heuristic.
pub fn predicted_results_forecast(table: &Table) -> Extracted<BandedForecastPayload> {
    let headers = table.headers();
    let actual_idx = resolve_column(headers, ACTUAL).ok_or(Unavailable)?;
    let predicted_idx = resolve_column(headers, PREDICTED).ok_or(Unavailable)?;
    let mut labels = Vec::new();
    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for row in table.rows() {
        let (a, p) = match (parse_num(&row[actual_idx]), parse_num(&row[predicted_idx])) {
            (Some(a), Some(p)) => (a, p),
            _ => continue,
        };
        labels.push((labels.len() + 1).to_string());
        actual.push(round2(a));
        predicted.push(round2(p));
    }
    if labels.is_empty() {
        return Err(Unavailable);
    }
    let upper_bound = predicted.iter().map(|p| round2(p * 1.08)).collect();
    let lower_bound = predicted.iter().map(|p| round2(p * 0.92)).collect();
    Ok(BandedForecastPayload {
        labels,
        actual,
        predicted,
        upper_bound,
        lower_bound,
    })
}

/// Prophet forecast output, last 30 numeric rows. Bound columns default to
/// yhat x0.9 / x1.1 when absent or unparsable; with no actuals in the file
/// the actual series mirrors the prediction.
pub fn forecast_output_forecast(table: &Table) -> Extracted<BandedForecastPayload> {
    let headers = table.headers();
    let yhat_idx = resolve_column(headers, YHAT_ONLY).ok_or(Unavailable)?;
    let ds = resolve_column(headers, DS_OR_DATE);
    let lower_idx = resolve_column(headers, YHAT_LOWER);
    let upper_idx = resolve_column(headers, YHAT_UPPER);

    struct Point {
        ds: String,
        yhat: f64,
        lower: f64,
        upper: f64,
    }
    let points: Vec<Point> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let yhat = parse_num(&row[yhat_idx])?;
            Some(Point {
                ds: match ds {
                    Some(d) => row[d].clone(),
                    None => (i + 1).to_string(),
                },
                yhat,
                lower: lower_idx
                    .and_then(|d| parse_num(&row[d]))
                    .unwrap_or(yhat * 0.9),
                upper: upper_idx
                    .and_then(|d| parse_num(&row[d]))
                    .unwrap_or(yhat * 1.1),
            })
        })
        .collect();
    if points.is_empty() {
        return Err(Unavailable);
    }
    let slice = &points[points.len().saturating_sub(30)..];
    let predicted: Vec<f64> = slice.iter().map(|p| round2(p.yhat)).collect();
    Ok(BandedForecastPayload {
        labels: slice.iter().map(|p| day_label(&p.ds)).collect(),
        actual: predicted.clone(),
        upper_bound: slice.iter().map(|p| round2(p.upper)).collect(),
        lower_bound: slice.iter().map(|p| round2(p.lower)).collect(),
        predicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::parse(text).unwrap()
    }

    #[test]
    fn test_round2_idempotent() {
        for x in [0.0, 1.005, 3.14159, -2.718, 12345.678] {
            let once = round2(x);
            assert_eq!(round2(once), once);
        }
    }

    #[test]
    fn test_hourly_series_labels_and_values() {
        let t = table("Datetime,GlobalPower\n2024-01-01 13:00:00,1.5\nnot-a-date,2.0\n");
        let out = hourly_series(&t).unwrap();
        assert_eq!(out.labels, vec!["Jan 1, 01 PM", "not-a-date"]);
        assert_eq!(out.data, vec![1.5, 2.0]);
    }

    #[test]
    fn test_hourly_series_refuses_misaligned_arrays() {
        // One bad value cell desynchronizes labels from data.
        let t = table("Datetime,power\n2024-01-01,1.0\n2024-01-02,oops\n");
        assert_eq!(hourly_series(&t), Err(Unavailable));
    }

    #[test]
    fn test_hourly_series_missing_column() {
        let t = table("Datetime,humidity\n2024-01-01,0.4\n");
        assert_eq!(hourly_series(&t), Err(Unavailable));
    }

    #[test]
    fn test_prophet_forecast_minimal() {
        // ds,y,yhat with one row: predicted [12.0], labels from the date.
        let t = table("ds,y,yhat\n2024-01-01,10,12\n");
        let out = prophet_forecast(&t).unwrap();
        assert_eq!(out.labels, vec!["Jan 1"]);
        assert_eq!(out.actual, vec![Some(10.0)]);
        assert_eq!(out.predicted, vec![Some(12.0)]);
        assert_eq!(out.lower_bound, None);
        assert_eq!(out.upper_bound, None);
    }

    #[test]
    fn test_prophet_forecast_rounds_and_null_coerces() {
        let t = table("ds,y,yhat,yhat_lower,yhat_upper\n2024-02-08,3.14159,bad,1.239,5.001\n");
        let out = prophet_forecast(&t).unwrap();
        assert_eq!(out.labels, vec!["Feb 8"]);
        assert_eq!(out.actual, vec![Some(3.14)]);
        assert_eq!(out.predicted, vec![None]);
        assert_eq!(out.lower_bound, Some(vec![Some(1.24)]));
        assert_eq!(out.upper_bound, Some(vec![Some(5.0)]));
    }

    #[test]
    fn test_prophet_forecast_without_actuals() {
        let t = table("ds,yhat\n2024-01-01,12\n2024-01-02,13\n");
        let out = prophet_forecast(&t).unwrap();
        assert_eq!(out.actual, vec![None, None]);
        assert_eq!(out.predicted, vec![Some(12.0), Some(13.0)]);
    }

    #[test]
    fn test_components_optional_terms() {
        let t = table("ds,trend\n2024-01-01,5.5\n");
        let out = prophet_components(&t).unwrap();
        assert_eq!(out.trend, vec![Some(5.5)]);
        assert_eq!(out.weekly, None);
        assert_eq!(out.yearly, None);

        let t = table("ds,trend,weekly,yearly\n2024-01-01,5.5,0.1,-0.2\n");
        let out = prophet_components(&t).unwrap();
        assert_eq!(out.weekly, Some(vec![Some(0.1)]));
        assert_eq!(out.yearly, Some(vec![Some(-0.2)]));
    }

    #[test]
    fn test_anomaly_timeline_flag_copies_actual() {
        let t = table("ds,y,anomaly_flag\nt1,100,False\nt2,200,True\n");
        let out = anomaly_timeline(&t).unwrap();
        assert_eq!(out.labels, vec!["t1", "t2"]);
        assert_eq!(out.actual, vec![Some(100.0), Some(200.0)]);
        assert_eq!(out.anomaly_points, vec![None, Some(200.0)]);
    }

    #[test]
    fn test_anomaly_timeline_flag_case_insensitive() {
        let t = table("ds,y,is_anomaly\nt1,1,TRUE\nt2,2,no\n");
        let out = anomaly_timeline(&t).unwrap();
        assert_eq!(out.anomaly_points, vec![Some(1.0), None]);
    }

    #[test]
    fn test_anomaly_timeline_without_flag_column() {
        let t = table("ds,y\nt1,1\n");
        let out = anomaly_timeline(&t).unwrap();
        assert!(out.anomaly_points.is_empty());
    }

    #[test]
    fn test_residual_distribution_truncates_bin_labels() {
        let t = table("bin_center,frequency\n12.7,4\n-3.2,9\n");
        let out = residual_distribution(&t).unwrap();
        assert_eq!(out.labels, vec!["12", "-3"]);
        assert_eq!(out.frequency, vec![4.0, 9.0]);
    }

    #[test]
    fn test_residual_distribution_refuses_misalignment() {
        let t = table("bin,freq\n1.0,2\n2.0,bad\n");
        assert_eq!(residual_distribution(&t), Err(Unavailable));
    }

    #[test]
    fn test_scatter_parallel_or_nothing() {
        let t = table("Temperature,GlobalPower\n20.5,1.1\n21.0,1.3\n");
        let out = scatter_sample(&t).unwrap();
        assert_eq!(out.temperature.len(), out.power.len());

        let t = table("Temperature,GlobalPower\nbad,1.1\n21.0,1.3\n");
        assert_eq!(scatter_sample(&t), Err(Unavailable));
    }

    #[test]
    fn test_metrics_exact_names_do_not_cross_match() {
        // lstm_mae must not satisfy the bare `mae` field.
        let t = table("lstm_mae,lstm_rmse\n2.5,3.1\n");
        let out = metrics_summary(&t).unwrap();
        assert_eq!(out.lstm_mae, Some(2.5));
        assert_eq!(out.lstm_rmse, Some(3.1));
        assert_eq!(out.mae, None);
        assert_eq!(out.rmse, None);
        assert_eq!(out.anomalies_count, None);
        assert_eq!(out.total_samples, None);
        assert_eq!(out.anomaly_rate_pct, None);
    }

    #[test]
    fn test_metrics_integer_rounding() {
        let t = table("anomalies_count,total_samples,mae\n17.6,1000.2,2.345\n");
        let out = metrics_summary(&t).unwrap();
        assert_eq!(out.anomalies_count, Some(18));
        assert_eq!(out.total_samples, Some(1000));
        // Scalars other than the counters stay floating point, unrounded.
        assert_eq!(out.mae, Some(2.345));
    }

    #[test]
    fn test_anomaly_list_order_and_optionals() {
        let t = table("timestamp,residual,actual,pred\nb,9.0,100,90\na,1.0,bad,80\n");
        let out = anomaly_list(&t).unwrap();
        assert_eq!(out.len(), 2);
        // File order preserved, no severity sort.
        assert_eq!(out[0].timestamp, "b");
        assert_eq!(out[1].timestamp, "a");
        assert_eq!(out[1].actual, None);
        assert_eq!(out[1].pred, Some(80.0));

        let t = table("ds,residual\nx,2.0\n");
        let out = anomaly_list(&t).unwrap();
        assert_eq!(out[0].actual, None);
        assert_eq!(out[0].pred, None);
    }

    #[test]
    fn test_anomaly_list_caps_at_100() {
        let mut text = String::from("timestamp,residual\n");
        for i in 0..150 {
            text.push_str(&format!("t{i},1.0\n"));
        }
        let out = anomaly_list(&table(&text)).unwrap();
        assert_eq!(out.len(), 100);
        assert_eq!(out[0].timestamp, "t0");
    }

    #[test]
    fn test_load_profile_lenient_count() {
        let t = table("hour,power\n0,1.0\n1,2.0\n2,bad\n");
        let out = hourly_load_profile(&t).unwrap();
        assert_eq!(out, vec![Some(1.0), Some(2.0), None]);
    }

    #[test]
    fn test_weekday_weekend_no_aggregation() {
        let t = table("label,power\nWeekday,3.2\nWeekend,4.1\n");
        let out = weekday_weekend(&t).unwrap();
        assert_eq!(out.labels, vec!["Weekday", "Weekend"]);
        assert_eq!(out.power, vec![Some(3.2), Some(4.1)]);
    }

    #[test]
    fn test_forecast_table_raw_strings() {
        let t = table("ds,yhat\n2024-01-01,12.345\n");
        let out = forecast_table(&t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["ds"], "2024-01-01");
        // No numeric coercion for the table view.
        assert_eq!(out[0]["yhat"], "12.345");
    }

    #[test]
    fn test_correlation_strips_unnamed_index() {
        let t = table("Unnamed: 0,a,b\na,1.0,0.5\nb,0.5,1.0\n");
        let out = correlation_matrix(&t).unwrap();
        assert_eq!(out.labels, vec!["a", "b"]);
        assert_eq!(
            out.matrix,
            vec![
                vec![Some(1.0), Some(0.5)],
                vec![Some(0.5), Some(1.0)],
            ]
        );
    }

    #[test]
    fn test_correlation_without_index_column() {
        let t = table("a,b\n1.0,bad\n0.5,1.0\n");
        let out = correlation_matrix(&t).unwrap();
        assert_eq!(out.labels, vec!["a", "b"]);
        assert_eq!(out.matrix[0], vec![Some(1.0), None]);
    }

    #[test]
    fn test_rolling_stats_optional_date() {
        let t = table("actual,rolling_mean\n5.0,4.9\n");
        let out = rolling_stats(&t).unwrap();
        assert_eq!(out.labels, vec![""]);
        assert_eq!(out.actual, vec![Some(5.0)]);
        assert_eq!(out.rolling_mean, Some(vec![Some(4.9)]));
        assert_eq!(out.rolling_std, None);
    }

    #[test]
    fn test_predicted_results_synthetic_bounds() {
        let t = table("actual,predicted\n10,10.0\nbad,1.0\n20,20.0\n");
        let out = predicted_results_forecast(&t).unwrap();
        // The non-numeric row is skipped entirely, ordinals stay dense.
        assert_eq!(out.labels, vec!["1", "2"]);
        assert_eq!(out.actual, vec![10.0, 20.0]);
        assert_eq!(out.predicted, vec![10.0, 20.0]);
        assert_eq!(out.upper_bound, vec![10.8, 21.6]);
        assert_eq!(out.lower_bound, vec![9.2, 18.4]);
    }

    #[test]
    fn test_predicted_results_all_bad_rows() {
        let t = table("actual,predicted\nx,y\n");
        assert_eq!(predicted_results_forecast(&t), Err(Unavailable));
    }

    #[test]
    fn test_forecast_output_default_bounds() {
        let t = table("ds,yhat\n2024-01-01,10.0\n");
        let out = forecast_output_forecast(&t).unwrap();
        assert_eq!(out.labels, vec!["Jan 1"]);
        assert_eq!(out.predicted, vec![10.0]);
        assert_eq!(out.actual, vec![10.0]);
        assert_eq!(out.lower_bound, vec![9.0]);
        assert_eq!(out.upper_bound, vec![11.0]);
    }

    #[test]
    fn test_forecast_output_explicit_bounds_and_window() {
        let mut text = String::from("ds,yhat,yhat_lower,yhat_upper\n");
        for i in 0..40 {
            text.push_str(&format!("2024-01-01,{i},{},{}\n", i as f64 - 1.0, i + 1));
        }
        let out = forecast_output_forecast(&table(&text)).unwrap();
        assert_eq!(out.labels.len(), 30);
        assert_eq!(out.predicted[0], 10.0);
        assert_eq!(out.lower_bound[0], 9.0);
        assert_eq!(out.upper_bound[0], 11.0);
    }

    #[test]
    fn test_forecast_output_ordinal_labels_without_ds() {
        let t = table("yhat\n5.0\n6.0\n");
        let out = forecast_output_forecast(&t).unwrap();
        assert_eq!(out.labels, vec!["1", "2"]);
    }
}
