//! Imputation module for handling missing values.
//!
//! Median imputation for numeric columns and mode imputation for text
//! columns, with a constant fallback for text columns that have no mode.

mod statistical;

pub use statistical::StatisticalImputer;
