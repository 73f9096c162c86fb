//! Batch processing command for a directory of bulletin dumps.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use idsp_core::{BatchProcessor, CompletenessReport, DumpInput};

use super::process::{format_failures, format_records, OutputFormat};
use super::{load_config, read_dump, source_name, VocabularyArgs};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for text dumps (e.g. "dumps/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output file (default: idsp_records_<date>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Failure log (default: idsp_failed_<date>.txt)
    #[arg(long)]
    failed_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Number of parallel workers (default: one per core)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Print completeness metrics for the assembled records
    #[arg(long)]
    metrics: bool,

    #[command(flatten)]
    vocabulary: VocabularyArgs,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

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

    let gazetteer = args.vocabulary.load(&config)?;
    let processor = BatchProcessor::new(gazetteer, &config);

    let mut inputs = Vec::with_capacity(files.len());
    let mut unreadable = Vec::new();
    for path in &files {
        match read_dump(path) {
            Ok(text) => inputs.push(DumpInput::new(source_name(path), text)),
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                unreadable.push(path.clone());
            }
        }
    }

    if let Some(jobs) = args.jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
            warn!("Could not size worker pool to {}: {}", jobs, e);
        }
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let worker_pb = pb.clone();
    let result = tokio::task::spawn_blocking(move || {
        processor.process_batch_with_progress(&inputs, |input| {
            debug!("Finished {}", input.source_file);
            worker_pb.inc(1);
        })
    })
    .await?;

    pb.finish_with_message("Complete");

    let today = chrono::Local::now().format("%d-%m-%Y").to_string();
    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("idsp_records_{}.{}", today, args.format.extension()))
    });
    let failed_path = args
        .failed_log
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("idsp_failed_{}.txt", today)));

    write_file(&output_path, &format_records(result.records.records(), args.format)?)?;
    write_file(&failed_path, &format_failures(&result.errors))?;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        result.dumps.len(),
        start.elapsed()
    );
    println!(
        "   {} records, {} skipped records, {} documents without records",
        style(result.records.len()).green(),
        style(result.errors.failed_records().len()).yellow(),
        style(result.errors.failed_documents().len()).red()
    );
    println!("   Records written to {}", output_path.display());
    println!("   Failure log written to {}", failed_path.display());

    println!();
    println!("{}", style("Failure counters:").bold());
    for (kind, n) in result.errors.summary() {
        let n = if n == 0 { style(n).dim() } else { style(n).yellow() };
        println!("  {:<22} {}", kind.as_str(), n);
    }

    if args.metrics {
        println!();
        println!("{}", style("Completeness:").bold());
        println!("{}", CompletenessReport::from_records(result.records.records()));
    }

    if !unreadable.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for path in &unreadable {
            println!("  - {}", path.display());
        }
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
