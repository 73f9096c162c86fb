//! Process command - extract outbreak records from a single text dump.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use idsp_core::{BatchProcessor, CanonicalRecord, ErrorAccumulator, OutputRow};

use super::{load_config, read_dump, source_name, VocabularyArgs};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text dump
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    vocabulary: VocabularyArgs,

    /// Print failure counters and skipped records to stderr
    #[arg(long)]
    show_failures: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON lines, one record per line
    Json,
    /// CSV with a header row
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "jsonl",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let gazetteer = args.vocabulary.load(&config)?;
    let processor = BatchProcessor::new(gazetteer, &config);

    info!("Processing file: {}", args.input.display());

    let text = read_dump(&args.input)?;
    let result = processor.process_text(&source_name(&args.input), &text);

    let output = format_records(result.records.records(), args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            result.records.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_failures {
        eprint!("{}", format_failures(&result.errors));
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_records(records: &[CanonicalRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(records),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_json(records: &[CanonicalRecord]) -> anyhow::Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(&record.to_row())?);
        output.push('\n');
    }
    Ok(output)
}

fn format_csv(records: &[CanonicalRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(vec![]);

    // Header is written explicitly so an empty result still has one
    wtr.write_record(OutputRow::COLUMNS)?;
    for record in records {
        wtr.serialize(record.to_row())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[CanonicalRecord]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        let row = record.to_row();
        output.push_str(&format!("Record {} ({})\n", i + 1, row.source_file));
        if !row.id_code.is_empty() {
            output.push_str(&format!("  ID:       {}\n", row.id_code));
        }
        output.push_str(&format!("  Place:    {} / {}\n", or_dash(&row.district), or_dash(&row.state)));
        output.push_str(&format!("  Disease:  {}\n", or_dash(&row.disease)));
        output.push_str(&format!(
            "  Cases:    {} ({} deaths){}\n",
            count(row.cases),
            count(row.deaths),
            if record.provisional_counts { " provisional" } else { "" }
        ));
        output.push_str(&format!(
            "  Dates:    {} to {}\n",
            or_dash(&row.start_date),
            or_dash(&row.report_date)
        ));
        output.push_str(&format!("  Status:   {}\n", row.status));
        if !row.comments.is_empty() {
            output.push_str(&format!("  Comments: {}\n", row.comments));
        }
        output.push('\n');
    }

    output.push_str(&format!("{} records\n", records.len()));
    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn count(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Failure log body: one `source<TAB>raw text` line per skipped record,
/// then the counter summary.
pub fn format_failures(errors: &ErrorAccumulator) -> String {
    let mut output = String::new();

    for failed in errors.failed_records() {
        output.push_str(&format!(
            "{}\t{}\n",
            failed.source_file,
            idsp_core::models::record::collapse_whitespace(&failed.raw_text)
        ));
    }
    for document in errors.failed_documents() {
        output.push_str(&format!("# no records: {}\n", document));
    }
    for (kind, n) in errors.summary() {
        output.push_str(&format!("# {:<22} {}\n", kind.as_str(), n));
    }

    output
}
