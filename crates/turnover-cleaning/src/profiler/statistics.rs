//! Statistical functions shared by profiling, imputation and outlier handling.

use crate::types::ColumnDescription;
use crate::utils::{is_numeric_dtype, missing_count, non_null_values, string_mode};
use polars::prelude::*;

/// Sort values ascending. NaN is never present (filtered on read).
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of pre-sorted values using linear interpolation.
///
/// The position is `q * (n - 1)`; the result interpolates between the two
/// neighbouring order statistics. Returns `None` for empty input.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Quantile of unsorted values using linear interpolation.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Median using linear interpolation (mean of the middle pair for even n).
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Descriptive statistics for one column.
pub(crate) fn describe_column(series: &Series) -> PolarsResult<ColumnDescription> {
    let missing = missing_count(series);
    let mut description = ColumnDescription {
        column: series.name().to_string(),
        dtype: format!("{:?}", series.dtype()),
        count: series.len() - missing,
        missing,
        ..ColumnDescription::default()
    };

    if is_numeric_dtype(series.dtype()) {
        let values = sorted(&non_null_values(series)?);
        description.count = values.len();
        description.mean = mean(&values);
        description.std = sample_std(&values);
        description.min = values.first().copied();
        description.q1 = quantile_sorted(&values, 0.25);
        description.median = quantile_sorted(&values, 0.5);
        description.q3 = quantile_sorted(&values, 0.75);
        description.max = values.last().copied();
    } else {
        description.unique = Some(series.drop_nulls().n_unique()?);
        if let Some((top, freq)) = string_mode(series)? {
            description.top = Some(top);
            description.freq = Some(freq);
        }
    }

    Ok(description)
}
