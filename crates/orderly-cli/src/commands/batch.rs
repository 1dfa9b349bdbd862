//! Batch command - extract orders from many message files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use orderly_core::{OrderParser, ParseResult};

use super::config::load_config;
use super::parse::{format_orders, reference_date, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (one message per .txt file)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Reference date for "today", "tmrw" and weekday names (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    parsed: Option<ParseResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = Arc::new(OrderParser::from_config(&config.extraction)?);
    let format = OutputFormat::resolve(args.format, &config)?;
    let today = reference_date(args.today, &config);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = process_files(files, parser, today, args.jobs, &progress).await?;
    results.sort_by(|a, b| a.path.cmp(&b.path));

    progress.finish_with_message("Complete");

    if !args.continue_on_error {
        if let Some(failed) = results.iter().find(|r| r.error.is_some()) {
            let message = failed.error.as_deref().unwrap_or("unknown error");
            error!("Failed to process {}: {}", failed.path.display(), message);
            anyhow::bail!("Processing failed: {}", message);
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.parsed.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(parsed) = &result.parsed {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("orders");
                let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

                let content = format_orders(&parsed.orders, format, config.output.pretty)?;
                tokio::fs::write(&output_path, content).await?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let order_count: usize = successful
        .iter()
        .filter_map(|r| r.parsed.as_ref())
        .map(|p| p.orders.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files ({} orders) in {:?}",
        style("✓").green(),
        results.len(),
        order_count,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Read and parse files on at most `jobs` concurrent tasks.
async fn process_files(
    files: Vec<PathBuf>,
    parser: Arc<OrderParser>,
    today: NaiveDate,
    jobs: usize,
    progress: &ProgressBar,
) -> anyhow::Result<Vec<FileResult>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let parser = Arc::clone(&parser);

        tasks.spawn(async move {
            let _permit = permit;
            let file_start = Instant::now();

            let (parsed, error) = match tokio::fs::read_to_string(&path).await {
                Ok(text) => (Some(parser.parse(&text, today)), None),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    (None, Some(e.to_string()))
                }
            };

            FileResult {
                path,
                parsed,
                error,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
        progress.inc(1);
    }

    Ok(results)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "orders",
        "units",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(parsed) = &result.parsed {
            let units: Vec<&str> = parsed
                .orders
                .iter()
                .filter_map(|o| o.unit.as_deref())
                .collect();

            wtr.write_record([
                filename,
                "success",
                &parsed.orders.len().to_string(),
                &units.join(" "),
                &parsed.warnings.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
