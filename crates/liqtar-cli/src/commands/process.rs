//! Process command - summarize a single settlement statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use liqtar_core::pdf::PageTextSource;
use liqtar_core::{
    format_amount, load_document, process_pages, render_report, ExtractionResult, LiqtarConfig,
};

use super::{load_config, write_atomic};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also render the summary as a PDF report
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Report title (default from config)
    #[arg(long)]
    title: Option<String>,

    /// Fail on the first malformed amount instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Keep "-IVA" rows in the summary
    #[arg(long)]
    no_suppress: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.strict {
        config.extraction.strict = true;
    }
    if args.no_suppress {
        config.extraction.suppress_negative_iva = false;
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args.input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let result = match process_statement(&args.input, &config, &pb) {
        Ok(result) => result,
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e);
        }
    };

    if let Some(report_path) = &args.report {
        pb.set_message("Rendering report...");
        pb.set_position(90);
        let title = args.title.as_deref().unwrap_or(&config.report.title);
        let bytes = render_report(&result.summary, title, &config)?;
        write_atomic(report_path, &bytes)?;
    }

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        write_atomic(output_path, output.as_bytes())?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(report_path) = &args.report {
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load, extract and summarize one statement file.
pub fn process_statement(
    path: &Path,
    config: &LiqtarConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionResult> {
    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(path)?;
    let extractor = load_document(&data, config)?;
    debug!("PDF has {} pages", extractor.page_count());

    pb.set_message("Extracting text...");
    pb.set_position(40);
    let pages = extractor.extract_pages()?;

    pb.set_message("Summarizing amounts...");
    pb.set_position(70);
    let result = process_pages(&pages, config)?;

    pb.set_position(100);
    Ok(result)
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["concepto", "monto"])?;
    for row in &result.summary.rows {
        let amount = row.amount.round_dp(2).to_string();
        wtr.write_record([row.label.as_str(), amount.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let label_width = result
        .summary
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Concepto".len());

    let mut output = String::new();
    output.push_str(&format!("{:<label_width$}  {:>16}\n", "Concepto", "Monto ($)"));
    output.push_str(&format!("{}\n", "-".repeat(label_width + 18)));
    for row in &result.summary.rows {
        output.push_str(&format!(
            "{:<label_width$}  {:>16}\n",
            row.label,
            format_amount(row.amount)
        ));
    }
    output.push_str(&format!("\nPages scanned: {}\n", result.pages_scanned));

    output
}
