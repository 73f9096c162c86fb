//! Core library for IDSP weekly outbreak bulletins.
//!
//! This crate provides:
//! - Era detection (numbered-list vs. tabular bulletin layout)
//! - Record segmentation of raw text dumps
//! - Rule-based field extraction (ID code, counts, dates, status)
//! - State, district and disease resolution against a gazetteer
//! - Failure counting and completeness metrics for whole batches

pub mod accumulator;
pub mod assembler;
pub mod bulletin;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod resolve;

pub use accumulator::{ErrorAccumulator, FailedRecord, FailureKind};
pub use assembler::{RecordAssembler, RecordSet};
pub use bulletin::{FormatDetector, RecordSegmenter, RuleBasedParser};
pub use error::{GazetteerError, IdspError, Result};
pub use models::config::IdspConfig;
pub use models::gazetteer::Gazetteer;
pub use models::record::{CanonicalRecord, Era, OutbreakStatus, OutputRow, RawDump};
pub use pipeline::{BatchOutput, BatchProcessor, DumpInput, DumpSummary};
pub use report::CompletenessReport;
pub use resolve::LocationDiseaseResolver;
