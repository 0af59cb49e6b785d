//! CLI entry point for the employee turnover cleaning pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use turnover_cleaning::config::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use turnover_cleaning::{
    CleaningStage, OutlierStrategy, Pipeline, PipelineConfig, ProgressUpdate, ReportGenerator,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Employee turnover dataset profiling and cleaning",
    long_about = "Profiles the employee turnover dataset, removes duplicates, imputes \
                  missing values, harmonizes categories, parses hourly rates, caps \
                  outliers and recomputes inconsistent annual salaries.\n\n\
                  EXAMPLES:\n  \
                  # Fixed file names in the working directory\n  \
                  turnover-cleaning\n\n  \
                  # Explicit paths with a JSON run report\n  \
                  turnover-cleaning -i raw.csv -o clean.csv -r run_report.json"
)]
struct Args {
    /// Path to the raw CSV file
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Path the cleaned CSV file is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress stage tables (only warnings, errors and the final line)
    #[arg(short, long)]
    quiet: bool,

    /// Write a JSON run report to this path
    #[arg(short = 'r', long)]
    emit_report: Option<PathBuf>,

    /// Keep exact duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Report outliers without capping them
    #[arg(long)]
    keep_outliers: bool,

    /// Ordinal keyword (repeatable, replaces the default list)
    #[arg(long = "ordinal-keyword", value_name = "KEYWORD")]
    ordinal_keywords: Vec<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Print one progress update as a stage header followed by its table.
///
/// This uses `println!` on purpose: the tables are the program's output and
/// must show regardless of the log level.
fn print_update(update: &ProgressUpdate) {
    match update.stage {
        CleaningStage::Complete | CleaningStage::Failed => return,
        _ => {}
    }

    println!("\n{}", "=".repeat(80));
    println!(
        "[{:>3.0}%] {}: {}",
        update.progress * 100.0,
        update.stage.display_name(),
        update.message
    );
    println!("{}", "=".repeat(80));

    if let Some(detail) = &update.detail {
        println!("{}", detail);
    }
}

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let strategy = if args.keep_outliers {
        OutlierStrategy::Keep
    } else {
        OutlierStrategy::Cap
    };

    let mut builder = PipelineConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .remove_duplicates(!args.keep_duplicates)
        .outlier_strategy(strategy);

    if !args.ordinal_keywords.is_empty() {
        builder = builder.ordinal_keywords(args.ordinal_keywords.iter());
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);
    info!(
        "{} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = build_config(&args)?;

    let quiet = args.quiet;
    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(move |update| {
            if !quiet {
                print_update(&update);
            }
        })
        .build()?;

    let result = pipeline.run()?;

    if let Some(report_path) = &args.emit_report {
        let report = ReportGenerator::build_run_report(&args.input, &args.output, &result.summary);
        let written = ReportGenerator::write_report_to_file(&report, report_path)?;
        info!("Run report written to '{}'", written.display());
    }

    let (rows, columns) = result.summary.final_checks.shape;
    println!(
        "\nCleaned dataset saved to '{}' ({} rows, {} columns, {} ms)",
        args.output.display(),
        rows,
        columns,
        result.summary.duration_ms
    );

    Ok(())
}
