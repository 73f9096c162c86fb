//! End-to-end processing of bulletin dumps.
//!
//! Each dump is handled by one worker with its own [`RecordSet`] and
//! [`ErrorAccumulator`]. Worker results are merged in input order, so a
//! parallel batch produces exactly the rows and counters of a sequential one.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::accumulator::{ErrorAccumulator, FailureKind};
use crate::assembler::{RecordAssembler, RecordSet};
use crate::bulletin::{FormatDetector, RecordParser, RecordSegmenter, RuleBasedParser, SegmentStrategy};
use crate::models::config::IdspConfig;
use crate::models::gazetteer::Gazetteer;
use crate::models::record::{Era, RawDump, Resolution};
use crate::resolve::LocationDiseaseResolver;

/// One document to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpInput {
    pub source_file: String,
    pub text: String,
}

impl DumpInput {
    pub fn new(source_file: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            text: text.into(),
        }
    }
}

/// Per-dump summary for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    pub source_file: String,
    pub era: Era,
    pub era_ambiguous: bool,
    pub strategy: SegmentStrategy,
    pub records: usize,
    pub failed_records: usize,
}

/// Records, failures and per-dump summaries of a run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub records: RecordSet,
    pub errors: ErrorAccumulator,
    pub dumps: Vec<DumpSummary>,
}

impl BatchOutput {
    fn merge(&mut self, other: BatchOutput) {
        self.records.append(other.records);
        self.errors.merge(other.errors);
        self.dumps.extend(other.dumps);
    }
}

/// Runs detection, segmentation, extraction, resolution and assembly.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    detector: FormatDetector,
    segmenter: RecordSegmenter,
    parser: RuleBasedParser,
    resolver: LocationDiseaseResolver,
    assembler: RecordAssembler,
    resolve_within_head: bool,
}

impl BatchProcessor {
    pub fn new(gazetteer: Arc<Gazetteer>, config: &IdspConfig) -> Self {
        Self {
            detector: FormatDetector::from_config(&config.segmentation),
            segmenter: RecordSegmenter::from_config(&config.segmentation),
            parser: RuleBasedParser::new(),
            resolver: LocationDiseaseResolver::from_config(gazetteer, &config.resolution),
            assembler: RecordAssembler::new(),
            resolve_within_head: config.resolution.resolve_within_head,
        }
    }

    /// Detect the era of a dump, counting an ambiguous detection.
    pub fn load_dump(&self, input: &DumpInput, errors: &mut ErrorAccumulator) -> RawDump {
        let detection = self.detector.detect(&input.text);
        if detection.ambiguous {
            warn!(
                "Ambiguous era for {}, using {}",
                input.source_file, detection.era
            );
            errors.record(FailureKind::EraAmbiguous);
        }
        RawDump::new(input.source_file.clone(), input.text.clone(), detection)
    }

    /// Segment and parse one dump, appending to `records` and `errors`.
    pub fn process_dump(
        &self,
        dump: &RawDump,
        records: &mut RecordSet,
        errors: &mut ErrorAccumulator,
    ) -> DumpSummary {
        let segmentation = self.segmenter.segment(dump);
        let mut summary = DumpSummary {
            source_file: dump.source_file.clone(),
            era: dump.era(),
            era_ambiguous: dump.detection.ambiguous,
            strategy: segmentation.strategy,
            records: 0,
            failed_records: 0,
        };

        if segmentation.is_empty() {
            errors.record_failed_document(&dump.source_file);
            return summary;
        }

        for record in &segmentation.records {
            let parsed = self.parser.parse(record);
            let text = record.text();

            if parsed.is_unparseable() {
                debug!("Unparseable record in {}: {:?}", dump.source_file, text);
                errors.record_failed_record(&dump.source_file, text);
                summary.failed_records += 1;
                continue;
            }

            for kind in parsed.failures() {
                errors.record(kind);
            }

            let search = if self.resolve_within_head {
                parsed.head(text)
            } else {
                text
            };
            let resolved = self.resolver.resolve(search);

            let canonical = self.assembler.assemble(record, parsed, resolved);
            if canonical.resolution.state == Resolution::Unresolved {
                errors.record(FailureKind::StateUnresolved);
            }
            if canonical.resolution.district == Resolution::Unresolved {
                errors.record(FailureKind::DistrictUnresolved);
            }
            if canonical.resolution.disease == Resolution::Unresolved {
                errors.record(FailureKind::DiseaseUnresolved);
            }

            records.push(canonical);
            summary.records += 1;
        }

        summary
    }

    /// Process a single document.
    pub fn process_text(&self, source_file: &str, text: &str) -> BatchOutput {
        self.process_input(&DumpInput::new(source_file, text))
    }

    fn process_input(&self, input: &DumpInput) -> BatchOutput {
        let mut output = BatchOutput::default();
        let dump = self.load_dump(input, &mut output.errors);
        let summary = self.process_dump(&dump, &mut output.records, &mut output.errors);

        info!(
            "Processed {}: {} era, {} records, {} failed",
            summary.source_file, summary.era, summary.records, summary.failed_records
        );

        output.dumps.push(summary);
        output
    }

    /// Process every input in parallel and merge in input order.
    pub fn process_batch(&self, inputs: &[DumpInput]) -> BatchOutput {
        self.process_batch_with_progress(inputs, |_| {})
    }

    /// Like [`process_batch`](Self::process_batch), calling `on_done` as each dump finishes.
    pub fn process_batch_with_progress<F>(&self, inputs: &[DumpInput], on_done: F) -> BatchOutput
    where
        F: Fn(&DumpInput) + Sync,
    {
        let start = Instant::now();

        let outputs: Vec<BatchOutput> = inputs
            .par_iter()
            .map(|input| {
                let output = self.process_input(input);
                on_done(input);
                output
            })
            .collect();

        let mut merged = BatchOutput::default();
        for output in outputs {
            merged.merge(output);
        }

        info!(
            "Batch of {} dumps: {} records, {} failures in {}ms",
            inputs.len(),
            merged.records.len(),
            merged.errors.total(),
            start.elapsed().as_millis()
        );

        merged
    }
}
