//! Bulletin text processing: era detection, segmentation and field rules.

mod era;
mod parser;
pub mod rules;
mod segmenter;

pub use era::FormatDetector;
pub use parser::{ParsedFields, RecordParser, RuleBasedParser};
pub use segmenter::{RecordSegmenter, SegmentStrategy, Segmentation};
