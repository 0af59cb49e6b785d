//! Outlier handling module.
//!
//! Detects outliers in numeric columns with the IQR method and caps them at
//! the fences (winsorizing). Detection runs over every column first; capping
//! then reuses the stored bounds, so no column sees bounds computed from
//! already-capped data.

use crate::config::{OutlierStrategy, PipelineConfig};
use crate::error::Result;
use crate::profiler::{quantile_sorted, sorted};
use crate::types::{OutlierBounds, OutlierReport};
use crate::utils::{column_series, non_null_values, numeric_column_names, numeric_values};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Detect outliers in every numeric column, then treat them according to
    /// the configured strategy.
    pub fn handle(df: DataFrame, config: &PipelineConfig) -> Result<(DataFrame, OutlierReport)> {
        info!("Detecting outliers (IQR x {})...", config.iqr_multiplier);

        let mut report = Self::detect(&df, config.iqr_multiplier)?;

        match config.outlier_strategy {
            OutlierStrategy::Cap => {
                let (df, capped) = Self::cap(df, &report)?;
                report.capped_values = capped;
                debug!("Capped {} values at the IQR fences", capped);
                Ok((df, report))
            }
            OutlierStrategy::Keep => {
                debug!("Kept all outliers as configured");
                Ok((df, report))
            }
        }
    }

    /// Compute bounds and counts for every numeric column, in table order.
    pub fn detect(df: &DataFrame, multiplier: f64) -> Result<OutlierReport> {
        let total_rows = df.height();
        let mut summary = Vec::new();

        for column in numeric_column_names(df) {
            let values = non_null_values(df.column(&column)?.as_materialized_series())?;
            if values.is_empty() {
                warn!("Column '{}' has no values, outlier bounds undefined", column);
            }

            let bounds = Self::compute_bounds(&values, total_rows, multiplier);
            if bounds.outlier_count > 0 {
                debug!(
                    "{}: {} outliers ({:.2}%), LB={:.2}, UB={:.2}",
                    column,
                    bounds.outlier_count,
                    bounds.outlier_percentage,
                    bounds.lower_bound,
                    bounds.upper_bound
                );
            }
            summary.push((column, bounds));
        }

        Ok(OutlierReport {
            summary,
            capped_values: 0,
        })
    }

    /// IQR fences of a set of non-missing values.
    ///
    /// `total_rows` is the full row count of the table, missing values
    /// included; it is the denominator of the outlier percentage. Empty input
    /// yields NaN bounds and no outliers.
    pub fn compute_bounds(values: &[f64], total_rows: usize, multiplier: f64) -> OutlierBounds {
        let sorted_values = sorted(values);
        let q1 = quantile_sorted(&sorted_values, 0.25).unwrap_or(f64::NAN);
        let q3 = quantile_sorted(&sorted_values, 0.75).unwrap_or(f64::NAN);
        let iqr = q3 - q1;

        let mut bounds = OutlierBounds {
            q1,
            q3,
            iqr,
            lower_bound: q1 - multiplier * iqr,
            upper_bound: q3 + multiplier * iqr,
            outlier_count: 0,
            outlier_percentage: 0.0,
        };

        bounds.outlier_count = values.iter().filter(|v| bounds.is_outlier(**v)).count();
        if total_rows > 0 {
            bounds.outlier_percentage = bounds.outlier_count as f64 / total_rows as f64 * 100.0;
        }

        bounds
    }

    /// Clamp every numeric column into its stored bounds.
    ///
    /// Missing values stay missing; capped columns become Float64. Returns the
    /// number of values that were moved to a fence.
    pub fn cap(mut df: DataFrame, report: &OutlierReport) -> Result<(DataFrame, usize)> {
        let mut capped_total = 0;

        for (column, bounds) in &report.summary {
            let series = column_series(&df, column)?;
            let mut capped_in_column = 0;

            let values: Vec<Option<f64>> = numeric_values(&series)?
                .into_iter()
                .map(|value| {
                    value.map(|v| {
                        let clamped = bounds.cap(v);
                        if clamped != v {
                            capped_in_column += 1;
                        }
                        clamped
                    })
                })
                .collect();

            df.replace(column, Series::new(column.as_str().into(), values))?;
            capped_total += capped_in_column;
        }

        Ok((df, capped_total))
    }
}
