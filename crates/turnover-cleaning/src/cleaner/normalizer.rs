//! Categorical value normalization.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::{CategoryValues, NormalizationReport};
use crate::utils::{distinct_in_order, is_text_dtype, title_case};
use polars::prelude::*;
use tracing::{debug, info};

/// Harmonizes spelling variants in categorical columns.
pub struct CategoryNormalizer;

impl CategoryNormalizer {
    /// Map synonyms on the configured column, then title-case every
    /// categorical column.
    ///
    /// Columns listed in `categorical_columns` that are missing from the
    /// table or are not text are skipped.
    pub fn normalize(
        mut df: DataFrame,
        categorical_columns: &[String],
        config: &PipelineConfig,
    ) -> Result<(DataFrame, NormalizationReport)> {
        info!("Normalizing {} categorical columns...", categorical_columns.len());

        let mut report = NormalizationReport::default();
        let text_columns: Vec<&String> = categorical_columns
            .iter()
            .filter(|name| {
                df.column(name)
                    .map(|c| is_text_dtype(c.dtype()))
                    .unwrap_or(false)
            })
            .collect();

        for column in &text_columns {
            let series = df.column(column)?.as_materialized_series();
            report.columns.push(CategoryValues {
                column: column.to_string(),
                unique_values: distinct_in_order(series)?,
            });
        }

        let mapping = &config.category_mapping;
        if let Ok(column) = df.column(&mapping.column)
            && is_text_dtype(column.dtype())
        {
            let mut mapped_cells = 0;
            let values: Vec<Option<String>> = column
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|value| {
                    value.map(|v| match mapping.synonyms.get(v) {
                        Some(canonical) => {
                            if canonical != v {
                                mapped_cells += 1;
                            }
                            canonical.clone()
                        }
                        None => v.to_string(),
                    })
                })
                .collect();

            df.replace(&mapping.column, Series::new(mapping.column.as_str().into(), values))?;
            debug!("Mapped {} value(s) in '{}'", mapped_cells, mapping.column);

            report.mapped_column = Some(mapping.column.clone());
            report.mapped_cells = mapped_cells;
        }

        for column in text_columns {
            let values: Vec<Option<String>> = df
                .column(column)?
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|value| value.map(title_case))
                .collect();

            df.replace(column, Series::new(column.as_str().into(), values))?;
            report.title_cased.push(column.clone());
        }

        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryMapping;
    use crate::utils::cell_strings;
    use pretty_assertions::assert_eq;

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        cell_strings(df.column(column).unwrap().as_materialized_series()).unwrap()
    }

    fn owned(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_paycheck_synonyms_are_mapped() {
        let df = df![
            "PaycheckMethod" => ["Mail Check", "MailedCheck", "Direct_Deposit"],
        ]
        .unwrap();
        let cats = vec!["PaycheckMethod".to_string()];

        let (cleaned, report) =
            CategoryNormalizer::normalize(df, &cats, &PipelineConfig::default()).unwrap();

        assert_eq!(
            strings(&cleaned, "PaycheckMethod"),
            owned(&["Mailed Check", "Mailed Check", "Direct Deposit"])
        );
        assert_eq!(report.mapped_cells, 3);
        assert_eq!(report.mapped_column.as_deref(), Some("PaycheckMethod"));
    }

    #[test]
    fn test_unmapped_values_are_title_cased() {
        let df = df![
            "PaycheckMethod" => [Some("direct deposit"), Some("PAYPAL"), None],
        ]
        .unwrap();
        let cats = vec!["PaycheckMethod".to_string()];

        let (cleaned, report) =
            CategoryNormalizer::normalize(df, &cats, &PipelineConfig::default()).unwrap();

        assert_eq!(
            strings(&cleaned, "PaycheckMethod"),
            vec![
                Some("Direct Deposit".to_string()),
                Some("Paypal".to_string()),
                None
            ]
        );
        assert_eq!(report.mapped_cells, 0);
    }

    #[test]
    fn test_mapping_runs_before_title_case() {
        // "mail check" is not an exact synonym, so it only gets title-cased.
        let df = df!["PaycheckMethod" => ["mail check", "Mail_Check"]].unwrap();
        let cats = vec!["PaycheckMethod".to_string()];

        let (cleaned, _) =
            CategoryNormalizer::normalize(df, &cats, &PipelineConfig::default()).unwrap();

        assert_eq!(
            strings(&cleaned, "PaycheckMethod"),
            owned(&["Mail Check", "Mailed Check"])
        );
    }

    #[test]
    fn test_every_categorical_column_title_cased() {
        let df = df![
            "Department" => ["human resources", "IT"],
            "JobLevel" => ["SENIOR", "junior"],
            "Age" => [30i64, 40],
        ]
        .unwrap();
        let cats = vec!["Department".to_string(), "JobLevel".to_string()];

        let (cleaned, report) =
            CategoryNormalizer::normalize(df, &cats, &PipelineConfig::default()).unwrap();

        assert_eq!(strings(&cleaned, "Department"), owned(&["Human Resources", "It"]));
        assert_eq!(strings(&cleaned, "JobLevel"), owned(&["Senior", "Junior"]));
        assert_eq!(report.title_cased, cats);
        assert_eq!(report.mapped_column, None);
    }

    #[test]
    fn test_report_lists_values_before_normalization() {
        let df = df!["Department" => ["sales", "Sales", "sales"]].unwrap();
        let cats = vec!["Department".to_string()];

        let (_, report) =
            CategoryNormalizer::normalize(df, &cats, &PipelineConfig::default()).unwrap();

        assert_eq!(report.columns[0].unique_values, vec!["sales", "Sales"]);
    }

    #[test]
    fn test_custom_mapping_column() {
        let mut mapping = CategoryMapping {
            column: "Shift".to_string(),
            synonyms: Default::default(),
        };
        mapping
            .synonyms
            .insert("Nite".to_string(), "Night".to_string());
        let config = PipelineConfig::builder()
            .category_mapping(mapping)
            .build()
            .unwrap();

        let df = df!["Shift" => ["Nite", "Day"]].unwrap();
        let (cleaned, report) = CategoryNormalizer::normalize(df, &[], &config).unwrap();

        assert_eq!(strings(&cleaned, "Shift"), owned(&["Night", "Day"]));
        assert_eq!(report.mapped_cells, 1);
    }
}
