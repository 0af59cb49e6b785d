//! Data cleaning module for the employee dataset.
//!
//! This module provides functionality for:
//! - Removing exact duplicate rows
//! - Normalizing categorical values (synonym mapping, title case)
//! - Parsing currency-formatted columns

mod converters;
mod normalizer;

pub use converters::{CurrencyParser, parse_currency};
pub use normalizer::CategoryNormalizer;

use crate::error::Result;
use crate::types::DuplicateReport;
use crate::utils::cell_strings;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Number of duplicate rows rendered in the report preview.
const DUPLICATE_PREVIEW_ROWS: usize = 5;

/// Data cleaner for row-level cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove exact duplicate rows, keeping the first occurrence.
    ///
    /// Two rows are duplicates when every cell is equal; missing equals
    /// missing. Kept rows retain their relative order.
    pub fn remove_duplicates(df: DataFrame) -> Result<(DataFrame, DuplicateReport)> {
        info!("Checking for exact duplicate rows...");

        let rows_before = df.height();
        let duplicate_mask = Self::duplicate_mask(&df)?;
        let duplicate_count = duplicate_mask.iter().filter(|d| **d).count();

        if duplicate_count == 0 {
            debug!("No duplicate rows found");
            return Ok((
                df,
                DuplicateReport {
                    rows_before,
                    rows_after: rows_before,
                    duplicate_count: 0,
                    preview: None,
                },
            ));
        }

        let duplicates = df.filter(&BooleanChunked::from_slice(
            "duplicates".into(),
            &duplicate_mask,
        ))?;
        let preview = duplicates.head(Some(DUPLICATE_PREVIEW_ROWS)).to_string();

        let keep: Vec<bool> = duplicate_mask.iter().map(|d| !d).collect();
        let df = df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;

        let rows_after = df.height();
        debug!("Removed {} duplicate rows", duplicate_count);

        Ok((
            df,
            DuplicateReport {
                rows_before,
                rows_after,
                duplicate_count,
                preview: Some(preview),
            },
        ))
    }

    /// Mark every row that repeats an earlier row.
    fn duplicate_mask(df: &DataFrame) -> Result<Vec<bool>> {
        let columns: Vec<Vec<Option<String>>> = df
            .get_columns()
            .iter()
            .map(|c| row_key_cells(c.as_materialized_series()))
            .collect::<PolarsResult<_>>()?;

        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(df.height());
        let mask = (0..df.height())
            .map(|row| {
                let key: Vec<Option<String>> =
                    columns.iter().map(|column| column[row].clone()).collect();
                !seen.insert(key)
            })
            .collect();

        Ok(mask)
    }
}

/// Cells of one column as duplicate-detection keys.
///
/// Floats are rendered with the sign of zero dropped, so `-0.0` matches `0.0`.
fn row_key_cells(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => Ok(series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(|x| (if x == 0.0 { 0.0 } else { x }).to_string()))
            .collect()),
        _ => cell_strings(series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let df = df![
            "id" => [1i64, 2, 1, 3, 2],
            "dept" => ["Sales", "IT", "Sales", "HR", "IT"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::remove_duplicates(df).unwrap();

        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 3);
        assert_eq!(report.duplicate_count, 2);
        assert!(report.preview.is_some());

        let ids: Vec<Option<i64>> = cleaned
            .column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_signed_zero_rows_are_duplicates() {
        let df = df![
            "Bonus" => [0.0, -0.0, 1.5],
            "dept" => ["Sales", "Sales", "IT"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_missing_equals_missing() {
        let df = df![
            "name" => [Some("Ann"), Some("Ann"), Some("Ann")],
            "gender" => [None, None, Some("F")],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_partial_match_is_not_duplicate() {
        let df = df![
            "a" => [1i64, 1],
            "b" => ["x", "y"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(report.duplicate_count, 0);
        assert!(report.preview.is_none());
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let df = df![
            "a" => [1i64, 1, 2, 2, 2],
        ]
        .unwrap();

        let (once, _) = DataCleaner::remove_duplicates(df).unwrap();
        let (twice, report) = DataCleaner::remove_duplicates(once.clone()).unwrap();

        assert_eq!(report.duplicate_count, 0);
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_remove_duplicates_empty_frame() {
        let df = df!["a" => Vec::<i64>::new()].unwrap();
        let (cleaned, report) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(report.duplicate_count, 0);
        assert_eq!(cleaned.height(), 0);
    }
}
