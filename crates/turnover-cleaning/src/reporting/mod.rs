//! Report generation module.
//!
//! This module loads the raw dataset, renders the final checks, saves the
//! cleaned dataset and writes the optional JSON run report.
//!
//! # Example
//!
//! ```rust,ignore
//! use turnover_cleaning::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_run_report(&input, &output, &result.summary);
//! ReportGenerator::write_report_to_file(&report, Path::new("run_report.json"))?;
//! ```

mod generator;

pub use generator::{ReportGenerator, RunReport};
