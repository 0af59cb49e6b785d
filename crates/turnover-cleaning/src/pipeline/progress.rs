//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline never prints. Each stage emits a [`ProgressUpdate`] carrying a
//! short message and, when the stage produced one, the rendered stage table in
//! `detail`. The binary decides what to show.
//!
//! # Example
//!
//! ```rust,ignore
//! use turnover_cleaning::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Loading the dataset
    Loading,
    /// Classifying column types
    Profiling,
    /// Shape and descriptive statistics
    Inspection,
    /// Removing exact duplicate rows
    Deduplication,
    /// Imputing missing values
    Imputation,
    /// Harmonizing categorical values
    Normalization,
    /// Parsing currency strings
    CurrencyParsing,
    /// Detecting and capping outliers
    OutlierHandling,
    /// Recomputing inconsistent annual salaries
    SalaryValidation,
    /// Final checks and CSV output
    Writing,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Stages that do work, in execution order.
    pub const ORDER: [CleaningStage; 10] = [
        Self::Loading,
        Self::Profiling,
        Self::Inspection,
        Self::Deduplication,
        Self::Imputation,
        Self::Normalization,
        Self::CurrencyParsing,
        Self::OutlierHandling,
        Self::SalaryValidation,
        Self::Writing,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Dataset",
            Self::Profiling => "Profiling Variables",
            Self::Inspection => "Inspecting Dataset",
            Self::Deduplication => "Removing Duplicates",
            Self::Imputation => "Imputing Missing Values",
            Self::Normalization => "Normalizing Categories",
            Self::CurrencyParsing => "Parsing Currency",
            Self::OutlierHandling => "Handling Outliers",
            Self::SalaryValidation => "Validating Salaries",
            Self::Writing => "Writing Output",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Overall progress (0.0 - 1.0) once this stage has finished.
    pub fn progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => {
                let position = Self::ORDER
                    .iter()
                    .position(|s| s == stage)
                    .unwrap_or_default();
                (position + 1) as f32 / Self::ORDER.len() as f32
            }
        }
    }
}

/// Progress update emitted after each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage that just finished
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing the stage outcome
    pub message: String,

    /// Rendered stage table, if the stage produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProgressUpdate {
    /// Creates a progress update without a detail table.
    pub fn new(stage: CleaningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a progress update carrying a rendered stage table.
    pub fn with_detail(
        stage: CleaningStage,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(stage, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Complete, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Failed, message)
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved to another thread.
pub trait ProgressReporter: Send + Sync {
    /// Called once per finished stage.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
