use crate::error::{CleaningError, Result, ResultExt};
use crate::types::{CleaningSummary, FinalChecks};
use crate::utils::missing_counts;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows rendered in the final sample.
const SAMPLE_ROWS: usize = 5;

/// Rows scanned for schema inference on the first load attempt.
const INFER_SCHEMA_ROWS: usize = 100;

/// Cell texts read as missing, in addition to empty fields.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ============================================================================
// Run Report
// ============================================================================

/// JSON summary of one cleaning run (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output file
    pub output_file: String,
    /// Every stage report of the run
    pub summary: CleaningSummary,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Loads the dataset, writes the cleaned dataset and builds run reports.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Load a CSV file with a header row.
    ///
    /// Empty fields and the usual spreadsheet markers (`NA`, `N/A`, `NaN`,
    /// `null`, ...) load as missing.
    ///
    /// Schema inference first looks at the leading rows only; if that read
    /// fails the whole file is scanned.
    pub fn load_csv(path: &Path) -> Result<DataFrame> {
        if !path.is_file() {
            return Err(CleaningError::InputNotFound(path.to_path_buf()));
        }

        match Self::read_csv(path, Some(INFER_SCHEMA_ROWS)) {
            Ok(df) => Ok(df),
            Err(e) => {
                debug!("Loading with partial schema inference failed: {}", e);
                Self::read_csv(path, None)
                    .context(format!("Failed to load '{}'", path.display()))
            }
        }
    }

    fn read_csv(path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
        let markers: Vec<PlSmallStr> = MISSING_MARKERS
            .iter()
            .map(|m| PlSmallStr::from(*m))
            .collect();

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(infer_schema_length)
            .with_parse_options(
                CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(markers))),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    }

    /// Shape, missing counts, dtypes and the first rows of the cleaned table.
    pub fn final_checks(df: &DataFrame) -> FinalChecks {
        FinalChecks {
            shape: df.shape(),
            missing: missing_counts(df),
            dtypes: df
                .get_columns()
                .iter()
                .map(|c| (c.name().to_string(), format!("{:?}", c.dtype())))
                .collect(),
            sample: df.head(Some(SAMPLE_ROWS)).to_string(),
        }
    }

    /// Write the table as comma-separated text with a header row and no
    /// index column.
    ///
    /// Parent directories are not created.
    pub fn write_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|e| CleaningError::write_failed(path, e))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)
            .map_err(|e| CleaningError::write_failed(path, e))?;

        info!("Cleaned dataset saved to '{}'", path.display());
        Ok(())
    }

    /// Build the run report of a finished pipeline.
    pub fn build_run_report(
        input_file: &Path,
        output_file: &Path,
        summary: &CleaningSummary,
    ) -> RunReport {
        RunReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.display().to_string(),
            output_file: output_file.display().to_string(),
            summary: summary.clone(),
        }
    }

    /// Write a run report as pretty JSON, creating parent directories.
    pub fn write_report_to_file(report: &RunReport, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Run report saved to '{}'", path.display());
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file() {
        let err = ReportGenerator::load_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.is_input_missing());
        assert_eq!(err.error_code(), "INPUT_NOT_FOUND");
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        let mut df = df![
            "Department" => ["Sales", "IT"],
            "Annual Salary" => [41_600.0, 52_000.0],
        ]
        .unwrap();

        ReportGenerator::write_dataset(&mut df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Department,Annual Salary\n"));

        let loaded = ReportGenerator::load_csv(&path).unwrap();
        assert_eq!(loaded.shape(), (2, 2));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("clean.csv");
        let mut df = df!["a" => [1i64]].unwrap();

        let err = ReportGenerator::write_dataset(&mut df, &path).unwrap_err();
        assert_eq!(err.error_code(), "WRITE_FAILED");
    }

    #[test]
    fn test_missing_markers_load_as_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "Age,Dept,Score\n25,Sales,1.5\nNA,N/A,NaN\n30,null,2.5\n40,IT,\n",
        )
        .unwrap();

        let df = ReportGenerator::load_csv(&path).unwrap();

        assert_eq!(df.column("Age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Age").unwrap().null_count(), 1);
        assert_eq!(df.column("Dept").unwrap().null_count(), 2);
        assert_eq!(df.column("Score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Score").unwrap().null_count(), 2);
    }

    #[test]
    fn test_final_checks() {
        let df = df![
            "Age" => [Some(30.0), None],
            "Gender" => ["F", "M"],
        ]
        .unwrap();

        let checks = ReportGenerator::final_checks(&df);

        assert_eq!(checks.shape, (2, 2));
        assert_eq!(
            checks.missing,
            vec![("Age".to_string(), 1), ("Gender".to_string(), 0)]
        );
        assert_eq!(checks.dtypes[1], ("Gender".to_string(), "String".to_string()));
        assert!(checks.sample.contains("Gender"));
    }

    #[test]
    fn test_write_run_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");
        let mut summary = CleaningSummary::new();
        summary.rows_before = 10;
        summary.add_step("Removed 1 duplicate row");

        let report = ReportGenerator::build_run_report(
            Path::new("in.csv"),
            Path::new("out.csv"),
            &summary,
        );
        ReportGenerator::write_report_to_file(&report, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_file"], "in.csv");
        assert_eq!(json["summary"]["rows_before"], 10);
        assert_eq!(json["summary"]["processing_steps"][0], "Removed 1 duplicate row");
    }
}
