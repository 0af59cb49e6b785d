//! Type inference logic for column analysis.

use crate::config::PipelineConfig;
use crate::types::{VariableSubtype, VariableType};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;

/// Whether a dtype counts as numeric for profiling.
///
/// Booleans count as numeric here (they are 0/1 counts), but they are left
/// alone by the imputer and the outlier handler.
pub(crate) fn is_quantitative_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean)
}

/// Classify a column from its dtype and distinct non-null values.
pub(crate) fn classify_column(
    dtype: &DataType,
    distinct_values: &[String],
    config: &PipelineConfig,
) -> (VariableType, VariableSubtype) {
    if is_quantitative_dtype(dtype) {
        let subtype = if distinct_values.len() > config.continuous_unique_threshold {
            VariableSubtype::Continuous
        } else {
            VariableSubtype::Discrete
        };
        return (VariableType::Quantitative, subtype);
    }

    let subtype = if distinct_values.len() <= config.ordinal_max_unique
        && distinct_values
            .iter()
            .any(|value| config.is_ordinal_keyword(value))
    {
        VariableSubtype::Ordinal
    } else {
        VariableSubtype::Nominal
    };

    (VariableType::Qualitative, subtype)
}
