//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use liqtar_core::{ExtractionResult, SummaryLine};

use super::process::{format_result, process_statement, OutputFormat};
use super::{load_config, write_atomic};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
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
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Each file gets its own parser and aggregator inside process_statement.
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();
    for path in files {
        let permits = Arc::clone(&permits);
        let config = Arc::clone(&config);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let file_start = Instant::now();
            let task_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                process_statement(&task_path, &config, &ProgressBar::hidden())
            })
            .await;
            let processing_time_ms = file_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(Ok(result)) => ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                },
                Ok(Err(e)) => ProcessResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    result: None,
                    error: Some(format!("worker failed: {}", e)),
                    processing_time_ms,
                },
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined?;
        if let Some(message) = &outcome.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), message);
            } else {
                error!("Failed to process {}: {}", outcome.path.display(), message);
                overall_pb.abandon_with_message("Failed");
                tasks.abort_all();
                anyhow::bail!("Processing failed for {}: {}", outcome.path.display(), message);
            }
        }
        overall_pb.inc(1);
        results.push(outcome);
    }
    overall_pb.finish_with_message("Complete");

    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Some(result) = &item.result {
                let output_path = output_path_for(output_dir, &item.path, args.format);
                let content = format_result(result, args.format)?;
                write_atomic(&output_path, content.as_bytes())?;
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

        let content = format_summary(&results)?;
        write_atomic(&summary_path, content.as_bytes())?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
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
        for item in &failed {
            println!(
                "  - {}: {}",
                item.path.display(),
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn output_path_for(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

/// One row per file: status, the eight summary amounts, timing and error.
fn format_summary(results: &[ProcessResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["filename", "status"];
    header.extend(SummaryLine::ORDER.iter().map(|line| line.label()));
    header.extend(["pages_scanned", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for item in results {
        let filename = item
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let mut record = vec![filename];

        match &item.result {
            Some(result) => {
                record.push("success".to_string());
                for line in SummaryLine::ORDER {
                    let amount = result
                        .summary
                        .amount_of(line.label())
                        .map(|a| a.round_dp(2).to_string())
                        .unwrap_or_default();
                    record.push(amount);
                }
                record.push(result.pages_scanned.to_string());
                record.push(item.processing_time_ms.to_string());
                record.push(String::new());
            }
            None => {
                record.push("error".to_string());
                record.extend(SummaryLine::ORDER.iter().map(|_| String::new()));
                record.push(String::new());
                record.push(item.processing_time_ms.to_string());
                record.push(item.error.clone().unwrap_or_default());
            }
        }

        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
