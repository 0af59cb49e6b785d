//! Employee Turnover Cleaning Library
//!
//! Profiling and cleaning of the employee turnover dataset, built on Polars.
//!
//! # Overview
//!
//! The pipeline runs these stages in order over one in-memory table:
//!
//! - **Profiling**: quantitative/qualitative type and subtype per column
//! - **Inspection**: shape and descriptive statistics
//! - **Duplicate Removal**: exact full-row duplicates, first occurrence kept
//! - **Imputation**: median for numeric columns, mode for text columns
//! - **Normalization**: payment method synonyms, title case for categories
//! - **Currency Parsing**: `"$1,250.00"` strings to Float64, with a raw backup
//! - **Outlier Capping**: IQR fences, computed once and then applied
//! - **Salary Validation**: annual salary vs. hourly rate x weekly hours x 52
//!
//! Each stage takes the table by value and returns it with a stage report.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use turnover_cleaning::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("Employee Turnover Dataset.csv")
//!     .output_path("Employee_Turnover_Cleaned.csv")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("{}", update.message))
//!     .build()?
//!     .run()?;
//!
//! println!("Final shape: {:?}", result.summary.final_checks.shape);
//! ```
//!
//! # In-memory Use
//!
//! [`Pipeline::process`] cleans a DataFrame without touching the filesystem,
//! and every stage is callable on its own:
//!
//! ```rust,ignore
//! use turnover_cleaning::pipeline::OutlierHandler;
//!
//! let (capped, report) = OutlierHandler::handle(df, &PipelineConfig::default())?;
//! for (column, bounds) in &report.summary {
//!     println!("{}: [{}, {}]", column, bounds.lower_bound, bounds.upper_bound);
//! }
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CategoryNormalizer, CurrencyParser, DataCleaner, parse_currency};
pub use config::{
    CategoryMapping, ConfigValidationError, OutlierStrategy, PipelineConfig,
    PipelineConfigBuilder, SalaryColumns,
};
pub use error::{CleaningError, Result as TurnoverResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, OutlierHandler, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate, SalaryValidator,
};
pub use profiler::DataProfiler;
pub use reporting::{ReportGenerator, RunReport};
pub use types::{
    CleaningResult, CleaningSummary, ColumnProfile, DatasetProfile, OutlierBounds,
    OutlierReport, VariableSubtype, VariableType,
};
