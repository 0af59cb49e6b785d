use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::truncate_str;

// ============================================================================
// Profiling Types
// ============================================================================

/// Statistical type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// Numbers that can be measured or counted.
    Quantitative,
    /// Labels or categories.
    Qualitative,
}

impl VariableType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Quantitative => "Quantitative/Numerical",
            Self::Qualitative => "Qualitative/Categorical",
        }
    }
}

/// Subtype refining a [`VariableType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSubtype {
    Continuous,
    Discrete,
    /// Inferred from the ordinal keyword set, never declared.
    Ordinal,
    Nominal,
}

impl VariableSubtype {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Continuous => "Continuous",
            Self::Discrete => "Discrete",
            Self::Ordinal => "Ordinal (inferred)",
            Self::Nominal => "Nominal",
        }
    }
}

/// Profile of a single column. Derived from the table, never stored back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub variable_type: VariableType,
    pub subtype: VariableSubtype,
    /// Distinct non-null values.
    pub unique_count: usize,
    pub missing_count: usize,
    /// Distinct non-null values in order of first appearance.
    pub sample_values: Vec<String>,
}

/// Column profiles of a whole table, rendered as the profiling table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
}

impl fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:<24} {:<20} {:>8} {:>8}  {}",
            "variable", "data_type", "subtype", "n_unique", "missing", "sample_values"
        )?;
        writeln!(f, "{}", "-".repeat(110))?;
        for col in &self.column_profiles {
            writeln!(
                f,
                "{:<24} {:<24} {:<20} {:>8} {:>8}  [{}]",
                truncate_str(&col.name, 23),
                col.variable_type.display_name(),
                col.subtype.display_name(),
                col.unique_count,
                col.missing_count,
                truncate_str(&col.sample_values.join(", "), 60)
            )?;
        }
        Ok(())
    }
}

/// Descriptive statistics for one column.
///
/// Text columns carry `unique`/`top`/`freq`; numeric columns carry the
/// moments and quantiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub column: String,
    pub dtype: String,
    pub count: usize,
    pub missing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Shape, column list and descriptive statistics of the raw table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionReport {
    pub rows: usize,
    pub columns: Vec<String>,
    pub descriptions: Vec<ColumnDescription>,
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn opt_count(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The dataset has {} rows and {} columns",
            self.rows,
            self.columns.len()
        )?;
        writeln!(f, "Columns: {:?}", self.columns)?;
        writeln!(f)?;
        writeln!(f, "Descriptive statistics:")?;
        writeln!(
            f,
            "{:<24} {:>6} {:>6} {:>16} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "", "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max"
        )?;
        for d in &self.descriptions {
            writeln!(
                f,
                "{:<24} {:>6} {:>6} {:>16} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                truncate_str(&d.column, 23),
                d.count,
                opt_count(d.unique),
                truncate_str(d.top.as_deref().unwrap_or("-"), 16),
                opt_count(d.freq),
                opt_num(d.mean),
                opt_num(d.std),
                opt_num(d.min),
                opt_num(d.q1),
                opt_num(d.median),
                opt_num(d.q3),
                opt_num(d.max)
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Stage Reports
// ============================================================================

/// Result of exact duplicate removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicate_count: usize,
    /// Rendered preview of the first duplicate rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exact duplicate rows: {}", self.duplicate_count)?;
        if let Some(preview) = &self.preview {
            writeln!(f, "First few duplicate rows:")?;
            writeln!(f, "{}", preview)?;
        }
        writeln!(f, "Original rows: {}", self.rows_before)?;
        write!(f, "Rows after dropping duplicates: {}", self.rows_after)
    }
}

/// How a column's missing values were filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FillMethod {
    Median { value: f64 },
    Mode { value: String },
    Constant { value: String },
}

/// One imputation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationAction {
    pub column: String,
    pub filled: usize,
    #[serde(flatten)]
    pub method: FillMethod,
}

impl fmt::Display for ImputationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            FillMethod::Median { value } => write!(
                f,
                "Filled {} value(s) in '{}' with median: {:.2}",
                self.filled, self.column, value
            ),
            FillMethod::Mode { value } => write!(
                f,
                "Filled {} value(s) in '{}' with mode: '{}'",
                self.filled, self.column, value
            ),
            FillMethod::Constant { value } => write!(
                f,
                "Filled {} value(s) in '{}' with constant value: '{}'",
                self.filled, self.column, value
            ),
        }
    }
}

/// Result of the missing-value imputation stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImputationReport {
    /// Missing counts before imputation, sorted descending.
    pub missing_before: Vec<(String, usize)>,
    /// Missing counts after imputation, sorted descending.
    pub missing_after: Vec<(String, usize)>,
    pub actions: Vec<ImputationAction>,
    /// Text columns handed on to categorical normalization.
    pub categorical_columns: Vec<String>,
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[(String, usize)]) -> fmt::Result {
    for (column, count) in counts {
        writeln!(f, "  {:<28} {}", truncate_str(column, 27), count)?;
    }
    Ok(())
}

impl fmt::Display for ImputationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Missing values per column:")?;
        write_counts(f, &self.missing_before)?;
        for action in &self.actions {
            writeln!(f, "  - {}", action)?;
        }
        writeln!(f, "Missing values after imputation:")?;
        write_counts(f, &self.missing_after)
    }
}

/// Distinct values observed in one categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryValues {
    pub column: String,
    pub unique_values: Vec<String>,
}

/// Result of categorical normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Distinct values before normalization.
    pub columns: Vec<CategoryValues>,
    /// Column the synonym table was applied to, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_column: Option<String>,
    /// Cells whose value changed through the synonym table.
    pub mapped_cells: usize,
    /// Columns that were title-cased.
    pub title_cased: Vec<String>,
}

impl fmt::Display for NormalizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in &self.columns {
            writeln!(
                f,
                "Column: {} - Unique Values Count: {}",
                col.column,
                col.unique_values.len()
            )?;
            writeln!(f, "{} -> {:?}", col.column, col.unique_values)?;
        }
        if let Some(column) = &self.mapped_column {
            writeln!(f, "Mapped {} value(s) in '{}'", self.mapped_cells, column)?;
        }
        write!(f, "Title-cased {} column(s)", self.title_cased.len())
    }
}

/// Result of parsing one currency-formatted column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyColumnReport {
    pub column: String,
    pub backup_column: String,
    /// Whether the backup column was created by this run.
    pub backup_created: bool,
    pub total: usize,
    /// Values missing after stripping and parsing.
    pub unparsed: usize,
    pub imputed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    pub dtype: String,
}

impl fmt::Display for CurrencyColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Column '{}': {} non-numeric/missing after stripping currency (of {})",
            self.column, self.unparsed, self.total
        )?;
        if self.imputed > 0
            && let Some(median) = self.median
        {
            writeln!(
                f,
                "Imputed {} values in '{}' with median = {:.2}",
                self.imputed, self.column, median
            )?;
        }
        write!(f, "'{}' dtype after cleaning: {}", self.column, self.dtype)
    }
}

/// Result of the currency parsing stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyReport {
    pub columns: Vec<CurrencyColumnReport>,
}

impl fmt::Display for CurrencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return write!(f, "No currency column found.");
        }
        let rendered: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

/// IQR fences and outlier counts for one numeric column.
///
/// Computed once from the pre-capping distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outlier_count: usize,
    /// Percentage of all rows, missing ones included.
    pub outlier_percentage: f64,
}

impl OutlierBounds {
    /// Check if a value lies strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }

    /// Clamp a value into the fences.
    pub fn cap(&self, value: f64) -> f64 {
        if value < self.lower_bound {
            self.lower_bound
        } else if value > self.upper_bound {
            self.upper_bound
        } else {
            value
        }
    }
}

/// Result of the outlier stage, keyed by column in table order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlierReport {
    pub summary: Vec<(String, OutlierBounds)>,
    /// Values replaced by a fence during capping.
    pub capped_values: usize,
}

impl OutlierReport {
    /// Bounds recorded for a column.
    pub fn bounds(&self, column: &str) -> Option<&OutlierBounds> {
        self.summary
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, b)| b)
    }
}

impl fmt::Display for OutlierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (column, b) in &self.summary {
            if b.outlier_count > 0 {
                writeln!(
                    f,
                    "{}: {} outliers ({:.2}%), LB={:.2}, UB={:.2}",
                    column, b.outlier_count, b.outlier_percentage, b.lower_bound, b.upper_bound
                )?;
            } else {
                writeln!(f, "{}: 0 outliers", column)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Outlier Summary:")?;
        writeln!(
            f,
            "{:<24} {:>10} {:>12} {:>14} {:>14} {:>12}",
            "variable", "n_outliers", "pct_outliers", "lower_bound", "upper_bound", "iqr"
        )?;
        for (column, b) in &self.summary {
            writeln!(
                f,
                "{:<24} {:>10} {:>12.4} {:>14.4} {:>14.4} {:>12.4}",
                truncate_str(column, 23),
                b.outlier_count,
                b.outlier_percentage,
                b.lower_bound,
                b.upper_bound,
                b.iqr
            )?;
        }
        write!(f, "Capped {} value(s)", self.capped_values)
    }
}

/// Result of the annual salary consistency check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryValidationReport {
    /// False when one of the required columns is absent.
    pub checked: bool,
    pub recomputed: usize,
}

impl fmt::Display for SalaryValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.checked {
            write!(f, "Recomputed Annual Salary for {} records.", self.recomputed)
        } else {
            write!(f, "Salary consistency check skipped.")
        }
    }
}

/// Final shape, missing counts, dtypes and sample rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalChecks {
    pub shape: (usize, usize),
    pub missing: Vec<(String, usize)>,
    pub dtypes: Vec<(String, String)>,
    /// Rendered first rows of the cleaned table.
    #[serde(skip)]
    pub sample: String,
}

impl fmt::Display for FinalChecks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final shape: {:?}", self.shape)?;
        writeln!(f)?;
        writeln!(f, "Missing counts (final):")?;
        write_counts(f, &self.missing)?;
        writeln!(f)?;
        writeln!(f, "Dtypes:")?;
        for (column, dtype) in &self.dtypes {
            writeln!(f, "  {:<28} {}", truncate_str(column, 27), dtype)?;
        }
        writeln!(f)?;
        writeln!(f, "Sample cleaned rows:")?;
        write!(f, "{}", self.sample)
    }
}

// ============================================================================
// Pipeline Summary
// ============================================================================

/// Every stage report of a cleaning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub profile: DatasetProfile,
    pub inspection: InspectionReport,
    pub duplicates: DuplicateReport,
    pub imputation: ImputationReport,
    pub normalization: NormalizationReport,
    pub currency: CurrencyReport,
    pub outliers: OutlierReport,
    pub salary: SalaryValidationReport,
    pub final_checks: FinalChecks,
    /// One line per action, in execution order.
    pub processing_steps: Vec<String>,
}

impl CleaningSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processing step.
    pub fn add_step(&mut self, step: impl Into<String>) {
        self.processing_steps.push(step.into());
    }
}

/// Cleaned table together with the summary of the run.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub data: DataFrame,
    pub summary: CleaningSummary,
}
