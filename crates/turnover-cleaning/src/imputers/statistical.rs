//! Statistical imputation methods.
//!
//! Numeric columns are filled with their median, text columns with their mode.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::profiler::median;
use crate::types::{FillMethod, ImputationAction, ImputationReport};
use crate::utils::{
    column_series, fill_numeric_nulls, fill_string_nulls, is_numeric_dtype, is_text_dtype,
    missing_count, missing_counts, non_null_values, string_mode, text_column_names,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every missing numeric and text cell, column by column.
    ///
    /// Columns of other dtypes are left untouched. The report lists the text
    /// columns, which are the input of categorical normalization.
    pub fn impute(
        mut df: DataFrame,
        config: &PipelineConfig,
    ) -> Result<(DataFrame, ImputationReport)> {
        info!("Imputing missing values...");

        let missing_before = sorted_missing_counts(&df);
        let mut actions = Vec::new();

        let targets: Vec<(String, DataType, usize)> = df
            .get_columns()
            .iter()
            .map(|c| {
                let missing = missing_count(c.as_materialized_series());
                (c.name().to_string(), c.dtype().clone(), missing)
            })
            .filter(|(_, _, missing)| *missing > 0)
            .collect();

        for (column, dtype, missing) in targets {
            let action = if is_numeric_dtype(&dtype) {
                Self::apply_numeric_median(&mut df, &column, missing)?
            } else if is_text_dtype(&dtype) {
                Some(Self::apply_mode_imputation(&mut df, &column, missing, config)?)
            } else {
                debug!("Skipping '{}' ({:?})", column, dtype);
                None
            };

            if let Some(action) = action {
                debug!("{}", action);
                actions.push(action);
            }
        }

        let report = ImputationReport {
            missing_before,
            missing_after: sorted_missing_counts(&df),
            actions,
            categorical_columns: text_column_names(&df),
        };

        Ok((df, report))
    }

    /// Fill a numeric column with the median of its non-missing values.
    ///
    /// Returns `None` when the column has no value to take a median from.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        missing: usize,
    ) -> Result<Option<ImputationAction>> {
        let series = column_series(df, col_name)?;

        let Some(median_val) = median(&non_null_values(&series)?) else {
            warn!("Column '{}' has no values, leaving it as is", col_name);
            return Ok(None);
        };

        df.replace(col_name, fill_numeric_nulls(&series, median_val)?)?;

        Ok(Some(ImputationAction {
            column: col_name.to_string(),
            filled: missing,
            method: FillMethod::Median { value: median_val },
        }))
    }

    /// Fill a text column with its most frequent value, falling back to the
    /// configured constant when the column has no value at all.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        missing: usize,
        config: &PipelineConfig,
    ) -> Result<ImputationAction> {
        let series = column_series(df, col_name)?;

        let (fill_value, method) = match string_mode(&series)? {
            Some((mode_val, _)) => (mode_val.clone(), FillMethod::Mode { value: mode_val }),
            None => {
                let constant = config.missing_category_fill.clone();
                (constant.clone(), FillMethod::Constant { value: constant })
            }
        };

        df.replace(col_name, fill_string_nulls(&series, &fill_value)?)?;

        Ok(ImputationAction {
            column: col_name.to_string(),
            filled: missing,
            method,
        })
    }
}

/// Missing counts sorted descending; ties keep column order.
fn sorted_missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    let mut counts = missing_counts(df);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_median_fill() {
        let df = df![
            "Age" => [Some(20i64), None, Some(30), Some(40), None],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();
        let age = cleaned.column("Age").unwrap();

        assert_eq!(age.dtype(), &DataType::Float64);
        assert_eq!(age.null_count(), 0);
        let values: Vec<Option<f64>> = age
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            values,
            vec![Some(20.0), Some(30.0), Some(30.0), Some(40.0), Some(30.0)]
        );
        assert_eq!(
            report.actions,
            vec![ImputationAction {
                column: "Age".to_string(),
                filled: 2,
                method: FillMethod::Median { value: 30.0 },
            }]
        );
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df![
            "Age" => [25.5, f64::NAN, 30.5, 40.5],
            "Dept" => ["Sales", "IT", "HR", "IT"],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();

        let values: Vec<Option<f64>> = cleaned
            .column("Age")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(25.5), Some(30.5), Some(30.5), Some(40.5)]);
        assert_eq!(report.missing_before[0], ("Age".to_string(), 1));
        assert!(report.missing_after.iter().all(|(_, count)| *count == 0));
        assert_eq!(
            report.actions,
            vec![ImputationAction {
                column: "Age".to_string(),
                filled: 1,
                method: FillMethod::Median { value: 30.5 },
            }]
        );
    }

    #[test]
    fn test_even_count_median_interpolates() {
        let df = df!["Tenure" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]].unwrap();

        let (cleaned, _) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();
        let value = cleaned
            .column("Tenure")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(2);
        assert_eq!(value, Some(2.5));
    }

    #[test]
    fn test_text_mode_fill() {
        let df = df![
            "Gender" => [Some("F"), None, Some("M"), Some("F")],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();
        let gender: Vec<Option<&str>> = cleaned
            .column("Gender")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(gender, vec![Some("F"), Some("F"), Some("M"), Some("F")]);
        assert_eq!(
            report.actions[0].method,
            FillMethod::Mode {
                value: "F".to_string()
            }
        );
    }

    #[test]
    fn test_all_missing_text_uses_sentinel() {
        let df = df![
            "Notes" => [Option::<&str>::None, None],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();
        let notes: Vec<Option<&str>> = cleaned
            .column("Notes")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(notes, vec![Some("Unknown"), Some("Unknown")]);
        assert_eq!(
            report.actions[0].method,
            FillMethod::Constant {
                value: "Unknown".to_string()
            }
        );
    }

    #[test]
    fn test_all_missing_numeric_left_alone() {
        let df = df![
            "Bonus" => [Option::<f64>::None, None],
            "Age" => [Some(30.0), None],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();

        assert_eq!(cleaned.column("Bonus").unwrap().null_count(), 2);
        assert_eq!(report.actions.len(), 1);
        assert_eq!(report.actions[0].column, "Age");
    }

    #[test]
    fn test_other_dtypes_untouched() {
        let df = df![
            "Active" => [Some(true), None],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();
        assert_eq!(cleaned.column("Active").unwrap().null_count(), 1);
        assert!(report.actions.is_empty());
    }

    #[test]
    fn test_missing_counts_sorted_descending() {
        let df = df![
            "a" => [Some(1.0), None, Some(2.0)],
            "b" => [Option::<&str>::None, None, Some("x")],
            "c" => [1.0, 2.0, 3.0],
            "d" => [None, Some(1.0), Some(2.0)],
        ]
        .unwrap();

        let (_, report) = StatisticalImputer::impute(df, &PipelineConfig::default()).unwrap();

        assert_eq!(
            report.missing_before,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 1),
                ("d".to_string(), 1),
                ("c".to_string(), 0),
            ]
        );
        assert!(report.missing_after.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_categorical_columns_listed() {
        let df = df![
            "Department" => ["Sales", "IT"],
            "Age" => [30i64, 40],
            "PaycheckMethod" => ["Mail Check", "Direct Deposit"],
        ]
        .unwrap();

        let (cleaned, report) = StatisticalImputer::impute(df.clone(), &PipelineConfig::default()).unwrap();

        assert_eq!(report.categorical_columns, vec!["Department", "PaycheckMethod"]);
        assert!(report.actions.is_empty());
        // Untouched numeric column keeps its dtype
        assert_eq!(cleaned.column("Age").unwrap().dtype(), &DataType::Int64);
    }
}
