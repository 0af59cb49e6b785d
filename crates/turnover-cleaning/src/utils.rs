//! Shared utilities for the cleaning pipeline.
//!
//! This module contains helper functions used across multiple stages to keep
//! dtype checks, cell rendering and null filling consistent.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds free text (the categorical columns of the dataset).
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String)
}

/// Names of all numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

/// Names of all text columns, in table order.
pub fn text_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_text_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

/// Check whether a column exists in the frame.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Owned copy of a column as a Series.
pub fn column_series(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|c| c.as_materialized_series().clone())
        .map_err(|_| CleaningError::ColumnNotFound(name.to_string()))
}

// =============================================================================
// Cell Access
// =============================================================================

/// Render every cell of a Series as an optional string (null stays `None`).
///
/// Non-text columns are cast to `String`, so `15.0` renders as `"15.0"`.
pub fn cell_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let rendered = if is_text_dtype(series.dtype()) {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };

    Ok(rendered
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Read a Series as optional `f64` values.
///
/// Casting is non-strict: values that cannot be represented become `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-null values of a numeric Series.
pub fn non_null_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Distinct non-null values in order of first appearance.
pub fn distinct_in_order(series: &Series) -> PolarsResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for value in cell_strings(series)?.into_iter().flatten() {
        if seen.insert(value.clone()) {
            distinct.push(value);
        }
    }
    Ok(distinct)
}

/// Missing cells of a Series: nulls, plus NaN in float columns.
pub fn missing_count(series: &Series) -> usize {
    let nan_count = match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            series.is_nan().map(|mask| mask.num_trues()).unwrap_or(0)
        }
        _ => 0,
    };
    series.null_count() + nan_count
}

/// Missing-value count for every column, in table order.
pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|c| (c.name().to_string(), missing_count(c.as_materialized_series())))
        .collect()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Most frequent non-null value of a Series, with its count.
///
/// Ties resolve to the smallest value so the result is deterministic.
pub fn string_mode(series: &Series) -> PolarsResult<Option<(String, usize)>> {
    let mut value_counts: HashMap<String, usize> = HashMap::new();
    for value in cell_strings(series)?.into_iter().flatten() {
        *value_counts.entry(value).or_insert(0) += 1;
    }

    Ok(value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        }))
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<Option<f64>> = numeric_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = cell_strings(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or_else(|| fill_value.to_string())))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Text Utilities
// =============================================================================

/// Title-case a string: a letter following a non-letter is upper-cased,
/// every other letter is lower-cased.
///
/// ```rust,ignore
/// assert_eq!(title_case("mailed CHECK"), "Mailed Check");
/// assert_eq!(title_case("o'neil"), "O'Neil");
/// ```
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut previous_is_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Truncate a string to max length with ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
