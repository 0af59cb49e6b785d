//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning workflow.

use crate::cleaner::{CategoryNormalizer, CurrencyParser, DataCleaner};
use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::pipeline::OutlierHandler;
use crate::pipeline::SalaryValidator;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::reporting::ReportGenerator;
use crate::types::{CleaningResult, CleaningSummary};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The main cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use turnover_cleaning::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().remove_duplicates(false).build()?)
///     .on_progress(|update| {
///         if let Some(detail) = &update.detail {
///             println!("{}", detail);
///         }
///     })
///     .build()?
///     .run()?;
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured input file, clean it and write the configured
    /// output file.
    pub fn run(&self) -> Result<CleaningResult> {
        let outcome = self.run_internal();
        self.finish(outcome)
    }

    /// Clean an in-memory DataFrame. Nothing is read or written.
    ///
    /// The returned summary carries the final checks of the cleaned table.
    pub fn process(&self, df: DataFrame) -> Result<CleaningResult> {
        let outcome = self.process_internal(df);
        self.finish(outcome)
    }

    fn finish(&self, outcome: Result<CleaningResult>) -> Result<CleaningResult> {
        match outcome {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaning completed in {} ms",
                    result.summary.duration_ms
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<CleaningResult> {
        let input = &self.config.input_path;
        info!("Loading dataset from '{}'", input.display());

        let df = ReportGenerator::load_csv(input).context("Loading dataset")?;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            format!(
                "Loaded '{}' ({} rows, {} columns)",
                input.display(),
                df.height(),
                df.width()
            ),
        ));

        let mut result = self.process_internal(df)?;

        let output = &self.config.output_path;
        ReportGenerator::write_dataset(&mut result.data, output)?;
        result
            .summary
            .add_step(format!("Wrote cleaned dataset to '{}'", output.display()));
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::Writing,
            format!("Cleaned dataset saved to '{}'", output.display()),
            result.summary.final_checks.to_string(),
        ));

        Ok(result)
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();
        let config = &self.config;

        info!("Starting cleaning pipeline...");

        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();

        // Step 1: Profile variable types
        info!("Step 1: Profiling variables...");
        summary.profile = DataProfiler::profile_dataset(&df, config).context("Profiling")?;
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::Profiling,
            format!("Profiled {} columns", summary.profile.column_profiles.len()),
            summary.profile.to_string(),
        ));

        // Step 2: Inspect shape and descriptive statistics
        info!("Step 2: Inspecting dataset...");
        summary.inspection = DataProfiler::inspect_dataset(&df).context("Inspection")?;
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::Inspection,
            format!("Dataset shape: {:?}", df.shape()),
            summary.inspection.to_string(),
        ));

        // Step 3: Remove exact duplicates
        let df = if config.remove_duplicates {
            info!("Step 3: Removing duplicate rows...");
            let (df, report) = DataCleaner::remove_duplicates(df).context("Deduplication")?;
            summary.add_step(format!(
                "Removed {} duplicate rows ({} -> {})",
                report.duplicate_count, report.rows_before, report.rows_after
            ));
            self.report_progress(ProgressUpdate::with_detail(
                CleaningStage::Deduplication,
                format!("Removed {} duplicate rows", report.duplicate_count),
                report.to_string(),
            ));
            summary.duplicates = report;
            df
        } else {
            info!("Step 3: Skipping duplicate removal (disabled)");
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Deduplication,
                "Duplicate removal disabled",
            ));
            df
        };

        // Step 4: Impute missing values
        info!("Step 4: Imputing missing values...");
        let (df, report) = StatisticalImputer::impute(df, config).context("Imputation")?;
        for action in &report.actions {
            summary.add_step(action.to_string());
        }
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::Imputation,
            format!("Imputed {} columns", report.actions.len()),
            report.to_string(),
        ));
        summary.imputation = report;

        // Step 5: Normalize categorical values
        info!("Step 5: Normalizing categorical values...");
        let (df, report) = CategoryNormalizer::normalize(
            df,
            &summary.imputation.categorical_columns,
            config,
        )
        .context("Normalization")?;
        if let Some(column) = &report.mapped_column {
            summary.add_step(format!(
                "Mapped {} value(s) in '{}'",
                report.mapped_cells, column
            ));
        }
        summary.add_step(format!(
            "Title-cased {} categorical column(s)",
            report.title_cased.len()
        ));
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::Normalization,
            format!("Normalized {} categorical columns", report.title_cased.len()),
            report.to_string(),
        ));
        summary.normalization = report;

        // Step 6: Parse currency strings
        info!("Step 6: Parsing currency columns...");
        let (df, report) = CurrencyParser::parse(df, config).context("Currency parsing")?;
        for column in &report.columns {
            summary.add_step(format!(
                "Parsed currency column '{}' ({} imputed)",
                column.column, column.imputed
            ));
        }
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::CurrencyParsing,
            format!("Parsed {} currency column(s)", report.columns.len()),
            report.to_string(),
        ));
        summary.currency = report;

        // Step 7: Detect and cap outliers
        info!("Step 7: Handling outliers...");
        let (df, report) = OutlierHandler::handle(df, config).context("Outlier handling")?;
        summary.add_step(format!(
            "Capped {} outlier value(s) across {} numeric columns",
            report.capped_values,
            report.summary.len()
        ));
        self.report_progress(ProgressUpdate::with_detail(
            CleaningStage::OutlierHandling,
            format!("Capped {} outlier value(s)", report.capped_values),
            report.to_string(),
        ));
        summary.outliers = report;

        // Step 8: Cross-field salary check
        info!("Step 8: Validating annual salaries...");
        let (df, report) = SalaryValidator::validate(df, config).context("Salary validation")?;
        if report.checked {
            summary.add_step(report.to_string());
        }
        self.report_progress(ProgressUpdate::new(
            CleaningStage::SalaryValidation,
            report.to_string(),
        ));
        summary.salary = report;

        summary.rows_after = df.height();
        summary.columns_after = df.width();
        summary.final_checks = ReportGenerator::final_checks(&df);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Cleaning finished: {:?} -> {:?} in {} ms",
            (summary.rows_before, summary.columns_before),
            (summary.rows_after, summary.columns_after),
            summary.duration_ms
        );

        Ok(CleaningResult { data: df, summary })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
