//! Failure counters and the raw-text failure log.
//!
//! Nothing here returns an error: every failure during a batch is recorded
//! and processing moves on. Workers keep their own accumulator and the
//! results are merged once at the end.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// No dominant 4-digit year; a best-guess era was used.
    EraAmbiguous,
    /// No anchor, marker or count/date group found in a dump.
    SegmentationFailed,
    /// Neither a date nor a case/death pair in a record.
    RecordUnparseable,
    /// Post-2016 record without an ID code.
    IdCodeMissing,
    DateMissing,
    CountsMissing,
    StatusMissing,
    /// "under <word>" found but the word is not a known status.
    StatusUnrecognized,
    StateUnresolved,
    DistrictUnresolved,
    DiseaseUnresolved,
}

impl FailureKind {
    pub const ALL: [FailureKind; 11] = [
        FailureKind::EraAmbiguous,
        FailureKind::SegmentationFailed,
        FailureKind::RecordUnparseable,
        FailureKind::IdCodeMissing,
        FailureKind::DateMissing,
        FailureKind::CountsMissing,
        FailureKind::StatusMissing,
        FailureKind::StatusUnrecognized,
        FailureKind::StateUnresolved,
        FailureKind::DistrictUnresolved,
        FailureKind::DiseaseUnresolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::EraAmbiguous => "era-ambiguous",
            FailureKind::SegmentationFailed => "segmentation-failed",
            FailureKind::RecordUnparseable => "record-unparseable",
            FailureKind::IdCodeMissing => "id-code-missing",
            FailureKind::DateMissing => "date-missing",
            FailureKind::CountsMissing => "counts-missing",
            FailureKind::StatusMissing => "status-missing",
            FailureKind::StatusUnrecognized => "status-unrecognized",
            FailureKind::StateUnresolved => "state-unresolved",
            FailureKind::DistrictUnresolved => "district-unresolved",
            FailureKind::DiseaseUnresolved => "disease-unresolved",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record skipped from output, kept verbatim for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    pub source_file: String,
    pub raw_text: String,
}

/// Failure counters, failure log and failed documents for one batch (or one worker).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorAccumulator {
    counters: BTreeMap<FailureKind, u64>,
    failed_records: Vec<FailedRecord>,
    failed_documents: Vec<String>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `kind`.
    pub fn record(&mut self, kind: FailureKind) {
        *self.counters.entry(kind).or_insert(0) += 1;
    }

    /// Log a record-level failure and count it as unparseable.
    pub fn record_failed_record(&mut self, source_file: &str, raw_text: &str) {
        self.record(FailureKind::RecordUnparseable);
        self.failed_records.push(FailedRecord {
            source_file: source_file.to_string(),
            raw_text: raw_text.to_string(),
        });
    }

    /// Log a dump that produced no records.
    pub fn record_failed_document(&mut self, source_file: &str) {
        self.record(FailureKind::SegmentationFailed);
        self.failed_documents.push(source_file.to_string());
    }

    pub fn count(&self, kind: FailureKind) -> u64 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counters.values().sum()
    }

    pub fn failed_records(&self) -> &[FailedRecord] {
        &self.failed_records
    }

    pub fn failed_documents(&self) -> &[String] {
        &self.failed_documents
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.failed_records.is_empty() && self.failed_documents.is_empty()
    }

    /// Fold another accumulator into this one, appending its logs after ours.
    pub fn merge(&mut self, other: ErrorAccumulator) {
        for (kind, n) in other.counters {
            *self.counters.entry(kind).or_insert(0) += n;
        }
        self.failed_records.extend(other.failed_records);
        self.failed_documents.extend(other.failed_documents);
    }

    /// Counter values for every kind, zeros included, in declaration order.
    pub fn summary(&self) -> Vec<(FailureKind, u64)> {
        FailureKind::ALL.iter().map(|k| (*k, self.count(*k))).collect()
    }
}

impl fmt::Display for ErrorAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, n) in self.summary() {
            writeln!(f, "{:<22} {}", kind.as_str(), n)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_record_counts_and_logs() {
        let mut acc = ErrorAccumulator::new();
        acc.record_failed_record("a.txt", "garbage");
        acc.record(FailureKind::DateMissing);

        assert_eq!(acc.count(FailureKind::RecordUnparseable), 1);
        assert_eq!(acc.count(FailureKind::DateMissing), 1);
        assert_eq!(acc.count(FailureKind::StateUnresolved), 0);
        assert_eq!(acc.failed_records().len(), 1);
        assert_eq!(acc.failed_records()[0].raw_text, "garbage");
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = ErrorAccumulator::new();
        first.record_failed_record("a.txt", "one");
        first.record_failed_document("c.txt");

        let mut second = ErrorAccumulator::new();
        second.record_failed_record("b.txt", "two");
        second.record(FailureKind::DiseaseUnresolved);

        first.merge(second);

        let sources: Vec<_> = first.failed_records().iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(sources, vec!["a.txt", "b.txt"]);
        assert_eq!(first.count(FailureKind::RecordUnparseable), 2);
        assert_eq!(first.failed_documents(), &["c.txt".to_string()]);
        assert_eq!(first.total(), 4);
    }

    #[test]
    fn test_summary_lists_every_kind() {
        let acc = ErrorAccumulator::new();
        let summary = acc.summary();
        assert_eq!(summary.len(), FailureKind::ALL.len());
        assert!(summary.iter().all(|(_, n)| *n == 0));
        assert!(acc.to_string().contains("state-unresolved"));
    }
}
