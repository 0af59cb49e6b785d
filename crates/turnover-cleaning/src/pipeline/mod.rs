//! Pipeline module.
//!
//! This module provides the main cleaning pipeline and the stages that only
//! make sense inside it: outlier capping and the salary consistency check.

mod builder;
pub mod outliers;
pub mod progress;
pub mod validation;

pub use builder::{Pipeline, PipelineBuilder};
pub use outliers::OutlierHandler;
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
pub use validation::SalaryValidator;
