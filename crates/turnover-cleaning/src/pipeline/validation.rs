//! Cross-field consistency check between pay columns.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::SalaryValidationReport;
use crate::utils::{column_series, has_column, numeric_values};
use polars::prelude::*;
use tracing::{debug, info};

/// Recomputes annual salaries that disagree with hourly rate x weekly hours.
pub struct SalaryValidator;

impl SalaryValidator {
    /// Replace every annual salary that deviates from
    /// `rate * hours * weeks_per_year` by more than the relative tolerance.
    ///
    /// Rows with a missing operand are left untouched. When any of the three
    /// columns is absent the check is skipped.
    pub fn validate(
        mut df: DataFrame,
        config: &PipelineConfig,
    ) -> Result<(DataFrame, SalaryValidationReport)> {
        let columns = &config.salary_columns;
        let required = [
            &columns.hourly_rate,
            &columns.hours_weekly,
            &columns.annual_salary,
        ];

        if let Some(missing) = required.iter().find(|c| !has_column(&df, c)) {
            debug!("Column '{}' not found, skipping salary check", missing);
            return Ok((df, SalaryValidationReport::default()));
        }

        info!("Checking annual salary consistency...");

        let rates = numeric_values(&column_series(&df, &columns.hourly_rate)?)?;
        let hours = numeric_values(&column_series(&df, &columns.hours_weekly)?)?;
        let salaries = numeric_values(&column_series(&df, &columns.annual_salary)?)?;

        let mut recomputed = 0;
        let values: Vec<Option<f64>> = salaries
            .iter()
            .zip(rates.iter().zip(hours.iter()))
            .map(|(salary, (rate, hours))| match (salary, rate, hours) {
                (Some(salary), Some(rate), Some(hours)) => {
                    let expected = rate * hours * config.weeks_per_year;
                    if (salary - expected).abs() > config.salary_tolerance * expected {
                        recomputed += 1;
                        Some(expected)
                    } else {
                        Some(*salary)
                    }
                }
                _ => *salary,
            })
            .collect();

        df.replace(
            &columns.annual_salary,
            Series::new(columns.annual_salary.as_str().into(), values),
        )?;

        debug!("Recomputed {} annual salaries", recomputed);

        Ok((
            df,
            SalaryValidationReport {
                checked: true,
                recomputed,
            },
        ))
    }
}
