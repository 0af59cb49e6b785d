//! Currency string conversion.

use crate::config::PipelineConfig;
use crate::error::{CleaningError, Result};
use crate::profiler::median;
use crate::types::{CurrencyColumnReport, CurrencyReport};
use crate::utils::{cell_strings, column_series, has_column};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};

/// Suffix of the column holding the raw strings of a parsed currency column.
pub const BACKUP_SUFFIX: &str = "_orig";

/// A number whose commas group the integer part in threes.
static THOUSANDS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d*)?$").expect("Invalid regex: thousands separator")
});

/// Parse a currency-formatted string such as `"$1,250.50"`.
///
/// Every `$` is removed and the remainder trimmed. Commas are only accepted as
/// thousands separators, so `"$20,00"` does not parse. This differs from plain
/// comma stripping, which would read it as 2000. Empty, unparseable and
/// non-finite values yield `None`.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let stripped = raw.replace('$', "");
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return None;
    }

    let digits = if trimmed.contains(',') {
        if !THOUSANDS_PATTERN.is_match(trimmed) {
            return None;
        }
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };

    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Converts currency-formatted text columns into Float64.
pub struct CurrencyParser;

impl CurrencyParser {
    /// Parse every column whose trimmed name matches the configured currency
    /// column.
    ///
    /// A `<column>_orig` backup of the raw values is appended unless one
    /// already exists. Unparseable values are filled with the median of the
    /// parsed ones.
    pub fn parse(mut df: DataFrame, config: &PipelineConfig) -> Result<(DataFrame, CurrencyReport)> {
        let target = config.currency_column.trim();
        let matching: Vec<String> = df
            .get_column_names()
            .iter()
            .filter(|name| name.trim() == target)
            .map(|name| name.to_string())
            .collect();

        let mut report = CurrencyReport::default();

        if matching.is_empty() {
            info!("No currency column '{}' found", target);
            return Ok((df, report));
        }

        for column in matching {
            let (parsed, column_report) = Self::parse_column(&mut df, &column)?;
            df.replace(&column, parsed)?;
            report.columns.push(column_report);
        }

        Ok((df, report))
    }

    fn parse_column(df: &mut DataFrame, column: &str) -> Result<(Series, CurrencyColumnReport)> {
        let series = column_series(df, column)?;
        let backup_column = format!("{}{}", column, BACKUP_SUFFIX);

        let backup_created = !has_column(df, &backup_column);
        if backup_created {
            let backup = series
                .cast(&DataType::String)
                .map_err(|e| CleaningError::TypeConversionFailed {
                    column: column.to_string(),
                    target_type: "String".to_string(),
                    reason: e.to_string(),
                })?
                .with_name(backup_column.as_str().into());
            df.with_column(backup)?;
            debug!("Added backup column '{}'", backup_column);
        }

        let parsed: Vec<Option<f64>> = cell_strings(&series)?
            .iter()
            .map(|cell| cell.as_deref().and_then(parse_currency))
            .collect();

        let unparsed = parsed.iter().filter(|v| v.is_none()).count();
        let valid: Vec<f64> = parsed.iter().flatten().copied().collect();
        let fill = median(&valid);

        let imputed = match fill {
            Some(_) => unparsed,
            None => {
                if unparsed > 0 {
                    warn!("Column '{}' has no parseable currency values", column);
                }
                0
            }
        };

        let values: Vec<Option<f64>> = parsed.into_iter().map(|v| v.or(fill)).collect();
        let cleaned = Series::new(column.into(), values);

        if imputed > 0
            && let Some(median) = fill
        {
            info!(
                "Imputed {} values in '{}' with median = {:.2}",
                imputed, column, median
            );
        }

        let report = CurrencyColumnReport {
            column: column.to_string(),
            backup_column,
            backup_created,
            total: series.len(),
            unparsed,
            imputed,
            median: fill,
            dtype: format!("{:?}", cleaned.dtype()),
        };

        Ok((cleaned, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        cell_strings(df.column(column).unwrap().as_materialized_series()).unwrap()
    }

    // ==================== parse_currency tests ====================

    #[test]
    fn test_parse_plain_currency() {
        assert_eq!(parse_currency("$15.00"), Some(15.0));
        assert_eq!(parse_currency("  $ 22.5 "), Some(22.5));
        assert_eq!(parse_currency("18"), Some(18.0));
    }

    #[test]
    fn test_parse_thousands_separator() {
        assert_eq!(parse_currency("$1,250.50"), Some(1250.5));
        assert_eq!(parse_currency("$1,000,000"), Some(1_000_000.0));
    }

    #[test]
    fn test_parse_rejects_misplaced_comma() {
        assert_eq!(parse_currency("$20,00"), None);
        assert_eq!(parse_currency("1,2345"), None);
        assert_eq!(parse_currency(",100"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_currency("abc"), None);
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("inf"), None);
        assert_eq!(parse_currency("NaN"), None);
    }

    // ==================== CurrencyParser tests ====================

    #[test]
    fn test_parse_column_with_median_fill() {
        let df = df![
            "HourlyRate" => [Some("$15.00"), Some("$20,00"), Some("abc"), Some("")],
        ]
        .unwrap();

        let (cleaned, report) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();

        assert_eq!(
            floats(&cleaned, "HourlyRate"),
            vec![Some(15.0), Some(15.0), Some(15.0), Some(15.0)]
        );
        assert_eq!(
            strings(&cleaned, "HourlyRate_orig"),
            vec![
                Some("$15.00".to_string()),
                Some("$20,00".to_string()),
                Some("abc".to_string()),
                Some(String::new()),
            ]
        );

        let column = &report.columns[0];
        assert_eq!(column.unparsed, 3);
        assert_eq!(column.imputed, 3);
        assert_eq!(column.median, Some(15.0));
        assert_eq!(column.dtype, "Float64");
        assert!(column.backup_created);
    }

    #[test]
    fn test_backup_column_is_appended_last() {
        let df = df![
            "HourlyRate" => ["$10", "$12"],
            "Department" => ["Sales", "IT"],
        ]
        .unwrap();

        let (cleaned, _) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();
        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(names, vec!["HourlyRate", "Department", "HourlyRate_orig"]);
    }

    #[test]
    fn test_existing_backup_is_preserved() {
        let df = df![
            "HourlyRate" => ["$10", "$12"],
            "HourlyRate_orig" => ["raw-a", "raw-b"],
        ]
        .unwrap();

        let (cleaned, report) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();

        assert!(!report.columns[0].backup_created);
        assert_eq!(
            strings(&cleaned, "HourlyRate_orig"),
            vec![Some("raw-a".to_string()), Some("raw-b".to_string())]
        );
        assert_eq!(cleaned.width(), 2);
    }

    #[test]
    fn test_trimmed_name_matches() {
        let df = df![
            " HourlyRate " => ["$9.50", "$10.50"],
        ]
        .unwrap();

        let (cleaned, report) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();

        assert_eq!(report.columns.len(), 1);
        assert_eq!(floats(&cleaned, " HourlyRate "), vec![Some(9.5), Some(10.5)]);
        assert!(has_column(&cleaned, " HourlyRate _orig"));
    }

    #[test]
    fn test_no_currency_column_is_a_notice() {
        let df = df!["Hourly Rate" => [20.0, 25.0]].unwrap();
        let before = df.clone();

        let (cleaned, report) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();

        assert!(report.columns.is_empty());
        assert_eq!(report.to_string(), "No currency column found.");
        assert!(cleaned.equals_missing(&before));
    }

    #[test]
    fn test_all_unparseable_stays_missing() {
        let df = df!["HourlyRate" => ["n/a", "?"]].unwrap();

        let (cleaned, report) = CurrencyParser::parse(df, &PipelineConfig::default()).unwrap();

        assert_eq!(floats(&cleaned, "HourlyRate"), vec![None, None]);
        assert_eq!(report.columns[0].imputed, 0);
        assert_eq!(report.columns[0].median, None);
    }
}
