//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the fixed behaviour of the employee turnover
//! cleaning run: the hardcoded file names, the ordinal keyword list, the
//! `PaycheckMethod` synonym table and the salary consistency columns.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Default input file, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "Employee Turnover Dataset.csv";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "Employee_Turnover_Cleaned.csv";

/// Keywords that mark a low-cardinality text column as ordinal.
pub const DEFAULT_ORDINAL_KEYWORDS: [&str; 7] =
    ["general", "medium", "high", "junior", "senior", "entry", "mid"];

/// Strategy for handling outliers in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutlierStrategy {
    /// Cap outliers at the IQR fences (winsorizing)
    #[default]
    Cap,
    /// Report outliers but leave values untouched
    Keep,
}

/// Synonym table applied to a single categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    /// Column the mapping applies to.
    pub column: String,
    /// Raw value -> canonical value. Matching is exact.
    pub synonyms: BTreeMap<String, String>,
}

impl Default for CategoryMapping {
    fn default() -> Self {
        let synonyms = [
            ("Mail Check", "Mailed Check"),
            ("Mailed Check", "Mailed Check"),
            ("Mail_Check", "Mailed Check"),
            ("MailedCheck", "Mailed Check"),
            ("Direct_Deposit", "Direct Deposit"),
            ("DirectDeposit", "Direct Deposit"),
            ("Direct Deposit", "Direct Deposit"),
        ]
        .into_iter()
        .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
        .collect();

        Self {
            column: "PaycheckMethod".to_string(),
            synonyms,
        }
    }
}

/// Names of the columns taking part in the annual salary consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryColumns {
    pub hourly_rate: String,
    pub hours_weekly: String,
    pub annual_salary: String,
}

impl Default for SalaryColumns {
    fn default() -> Self {
        Self {
            hourly_rate: "Hourly Rate".to_string(),
            hours_weekly: "Hours Weekly".to_string(),
            annual_salary: "Annual Salary".to_string(),
        }
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use turnover_cleaning::config::{PipelineConfig, OutlierStrategy};
///
/// let config = PipelineConfig::builder()
///     .iqr_multiplier(3.0)
///     .outlier_strategy(OutlierStrategy::Keep)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CSV file the dataset is loaded from.
    /// Default: "Employee Turnover Dataset.csv"
    pub input_path: PathBuf,

    /// CSV file the cleaned dataset is written to.
    /// Default: "Employee_Turnover_Cleaned.csv"
    pub output_path: PathBuf,

    /// Whether to remove exact duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Strategy for handling outliers in numeric columns.
    /// Default: Cap
    pub outlier_strategy: OutlierStrategy,

    /// Multiplier applied to the IQR to build the outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Numeric columns with more distinct values than this are continuous.
    /// Default: 20
    pub continuous_unique_threshold: usize,

    /// Text columns with at most this many distinct values may be ordinal.
    /// Default: 12
    pub ordinal_max_unique: usize,

    /// Lowercase keywords that mark a text column as ordinal.
    pub ordinal_keywords: BTreeSet<String>,

    /// Number of distinct sample values kept per column profile.
    /// Default: 8
    pub max_sample_values: usize,

    /// Fill value for text columns that have no mode.
    /// Default: "Unknown"
    pub missing_category_fill: String,

    /// Synonym table for the payment method column.
    pub category_mapping: CategoryMapping,

    /// Name (after trimming) of the currency-formatted column.
    /// Default: "HourlyRate"
    pub currency_column: String,

    /// Columns used by the annual salary consistency check.
    pub salary_columns: SalaryColumns,

    /// Relative tolerance before an annual salary is recomputed.
    /// Default: 0.01 (1%)
    pub salary_tolerance: f64,

    /// Weeks per year used to annualize hourly pay.
    /// Default: 52
    pub weeks_per_year: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            remove_duplicates: true,
            outlier_strategy: OutlierStrategy::default(),
            iqr_multiplier: 1.5,
            continuous_unique_threshold: 20,
            ordinal_max_unique: 12,
            ordinal_keywords: default_ordinal_keywords(),
            max_sample_values: 8,
            missing_category_fill: "Unknown".to_string(),
            category_mapping: CategoryMapping::default(),
            currency_column: "HourlyRate".to_string(),
            salary_columns: SalaryColumns::default(),
            salary_tolerance: 0.01,
            weeks_per_year: 52.0,
        }
    }
}

fn default_ordinal_keywords() -> BTreeSet<String> {
    DEFAULT_ORDINAL_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Check whether a raw cell value matches one of the ordinal keywords.
    pub fn is_ordinal_keyword(&self, value: &str) -> bool {
        self.ordinal_keywords.contains(&normalize_keyword(value))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        if !(0.0..=1.0).contains(&self.salary_tolerance) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "salary_tolerance".to_string(),
                value: self.salary_tolerance,
            });
        }

        if !self.weeks_per_year.is_finite() || self.weeks_per_year <= 0.0 {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "weeks_per_year".to_string(),
                value: self.weeks_per_year,
            });
        }

        if self.currency_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName(
                "currency_column".to_string(),
            ));
        }

        if self.max_sample_values == 0 {
            return Err(ConfigValidationError::InvalidSampleSize(
                self.max_sample_values,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value}")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a positive number)")]
    InvalidMultiplier(f64),

    #[error("Column name for '{0}' must not be empty")]
    EmptyColumnName(String),

    #[error("Invalid sample size: {0} (must be at least 1)")]
    InvalidSampleSize(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    remove_duplicates: Option<bool>,
    outlier_strategy: Option<OutlierStrategy>,
    iqr_multiplier: Option<f64>,
    continuous_unique_threshold: Option<usize>,
    ordinal_max_unique: Option<usize>,
    ordinal_keywords: Option<BTreeSet<String>>,
    max_sample_values: Option<usize>,
    missing_category_fill: Option<String>,
    category_mapping: Option<CategoryMapping>,
    currency_column: Option<String>,
    salary_columns: Option<SalaryColumns>,
    salary_tolerance: Option<f64>,
    weeks_per_year: Option<f64>,
}

impl PipelineConfigBuilder {
    /// Set the CSV file to load.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the CSV file the cleaned dataset is written to.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set the strategy for handling outliers.
    pub fn outlier_strategy(mut self, strategy: OutlierStrategy) -> Self {
        self.outlier_strategy = Some(strategy);
        self
    }

    /// Set the IQR multiplier for the outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the distinct-count threshold separating continuous from discrete.
    pub fn continuous_unique_threshold(mut self, threshold: usize) -> Self {
        self.continuous_unique_threshold = Some(threshold);
        self
    }

    /// Set the maximum distinct count for an ordinal text column.
    pub fn ordinal_max_unique(mut self, max_unique: usize) -> Self {
        self.ordinal_max_unique = Some(max_unique);
        self
    }

    /// Replace the ordinal keyword set.
    ///
    /// Keywords are trimmed and lowercased; duplicates collapse.
    pub fn ordinal_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ordinal_keywords = Some(
            keywords
                .into_iter()
                .map(|k| normalize_keyword(k.as_ref()))
                .filter(|k| !k.is_empty())
                .collect(),
        );
        self
    }

    /// Set the number of sample values kept per column profile.
    pub fn max_sample_values(mut self, count: usize) -> Self {
        self.max_sample_values = Some(count);
        self
    }

    /// Set the fill value used for text columns without a mode.
    pub fn missing_category_fill(mut self, value: impl Into<String>) -> Self {
        self.missing_category_fill = Some(value.into());
        self
    }

    /// Set the synonym table for categorical normalization.
    pub fn category_mapping(mut self, mapping: CategoryMapping) -> Self {
        self.category_mapping = Some(mapping);
        self
    }

    /// Set the currency-formatted column name.
    pub fn currency_column(mut self, column: impl Into<String>) -> Self {
        self.currency_column = Some(column.into());
        self
    }

    /// Set the columns used by the salary consistency check.
    pub fn salary_columns(mut self, columns: SalaryColumns) -> Self {
        self.salary_columns = Some(columns);
        self
    }

    /// Set the relative tolerance of the salary consistency check.
    pub fn salary_tolerance(mut self, tolerance: f64) -> Self {
        self.salary_tolerance = Some(tolerance);
        self
    }

    /// Set the number of weeks per year used to annualize hourly pay.
    pub fn weeks_per_year(mut self, weeks: f64) -> Self {
        self.weeks_per_year = Some(weeks);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            input_path: self
                .input_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            outlier_strategy: self.outlier_strategy.unwrap_or_default(),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            continuous_unique_threshold: self.continuous_unique_threshold.unwrap_or(20),
            ordinal_max_unique: self.ordinal_max_unique.unwrap_or(12),
            ordinal_keywords: self
                .ordinal_keywords
                .unwrap_or_else(default_ordinal_keywords),
            max_sample_values: self.max_sample_values.unwrap_or(8),
            missing_category_fill: self
                .missing_category_fill
                .unwrap_or_else(|| "Unknown".to_string()),
            category_mapping: self.category_mapping.unwrap_or_default(),
            currency_column: self
                .currency_column
                .unwrap_or_else(|| "HourlyRate".to_string()),
            salary_columns: self.salary_columns.unwrap_or_default(),
            salary_tolerance: self.salary_tolerance.unwrap_or(0.01),
            weeks_per_year: self.weeks_per_year.unwrap_or(52.0),
        };

        config.validate()?;
        Ok(config)
    }
}
