//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Statistical type inference for columns (quantitative/qualitative)
//! - Subtype heuristics (continuous/discrete, ordinal/nominal)
//! - Descriptive statistics for inspection

mod statistics;
mod type_inference;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::{ColumnProfile, DatasetProfile, InspectionReport};
use crate::utils::{distinct_in_order, missing_count};
use polars::prelude::*;
use tracing::debug;

pub use statistics::{mean, median, quantile, sample_std};
pub(crate) use statistics::{describe_column, quantile_sorted, sorted};
pub(crate) use type_inference::classify_column;

/// Data profiler for analyzing dataset structure. Never mutates the table.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of the dataset.
    pub fn profile_dataset(df: &DataFrame, config: &PipelineConfig) -> Result<DatasetProfile> {
        let mut column_profiles = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let profile = Self::profile_column(column.as_materialized_series(), config)?;
            debug!(
                "  {}: {:?} / {:?} ({} unique, {} missing)",
                profile.name,
                profile.variable_type,
                profile.subtype,
                profile.unique_count,
                profile.missing_count
            );
            column_profiles.push(profile);
        }

        Ok(DatasetProfile {
            shape: (df.height(), df.width()),
            column_profiles,
        })
    }

    fn profile_column(series: &Series, config: &PipelineConfig) -> Result<ColumnProfile> {
        let distinct = distinct_in_order(series)?;
        let (variable_type, subtype) = classify_column(series.dtype(), &distinct, config);

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: format!("{:?}", series.dtype()),
            variable_type,
            subtype,
            unique_count: distinct.len(),
            missing_count: missing_count(series),
            sample_values: distinct
                .into_iter()
                .take(config.max_sample_values)
                .collect(),
        })
    }

    /// Describe the dataset: shape, column names and per-column statistics.
    pub fn inspect_dataset(df: &DataFrame) -> Result<InspectionReport> {
        let mut descriptions = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            descriptions.push(describe_column(column.as_materialized_series())?);
        }

        Ok(InspectionReport {
            rows: df.height(),
            columns: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            descriptions,
        })
    }
}
