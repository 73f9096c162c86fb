//! Outbreak record models: raw dumps, segmented spans and canonical records.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Layout generation of a bulletin, which decides the segmentation grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Era {
    /// Numbered-list layout used before 2016.
    Pre2016,
    /// Tabular layout with a unique ID column, 2016 onwards.
    Post2016,
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Era::Pre2016 => f.write_str("pre-2016"),
            Era::Post2016 => f.write_str("post-2016"),
        }
    }
}

/// Outcome of era detection on one dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraDetection {
    /// Detected (or best-guess) era.
    pub era: Era,
    /// Most frequent 4-digit value, if any was found.
    pub reference_year: Option<u32>,
    /// True when no year was found or the top count was tied.
    pub ambiguous: bool,
}

/// Full text of one source document.
#[derive(Debug, Clone)]
pub struct RawDump {
    /// Source identifier, usually the file name.
    pub source_file: String,
    /// Text as produced by the PDF-to-text step.
    pub text: String,
    /// Era detected from the text.
    pub detection: EraDetection,
}

impl RawDump {
    pub fn new(source_file: impl Into<String>, text: impl Into<String>, detection: EraDetection) -> Self {
        Self {
            source_file: source_file.into(),
            text: text.into(),
            detection,
        }
    }

    pub fn era(&self) -> Era {
        self.detection.era
    }
}

/// A span of a dump attributed to a single outbreak.
#[derive(Debug, Clone)]
pub struct RawRecord<'a> {
    /// Dump the span was cut from.
    pub dump: &'a RawDump,
    /// Byte range into `dump.text`.
    pub span: Range<usize>,
    /// Count/date group the span was cut around, as a byte range into
    /// `dump.text`. Only set for group-split records, whose spans share text
    /// with their neighbours.
    pub anchor: Option<Range<usize>>,
}

impl<'a> RawRecord<'a> {
    pub fn new(dump: &'a RawDump, span: Range<usize>) -> Self {
        Self { dump, span, anchor: None }
    }

    pub fn with_anchor(mut self, anchor: Range<usize>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// The anchor group relative to the record text.
    pub fn anchor_in_record(&self) -> Option<Range<usize>> {
        let anchor = self.anchor.as_ref()?;
        (anchor.start >= self.span.start && anchor.end <= self.span.end)
            .then(|| anchor.start - self.span.start..anchor.end - self.span.start)
    }

    /// Record text, borrowed from the dump.
    pub fn text(&self) -> &'a str {
        &self.dump.text[self.span.clone()]
    }

    pub fn source_file(&self) -> &'a str {
        &self.dump.source_file
    }

    pub fn era(&self) -> Era {
        self.dump.era()
    }
}

/// Current status of an outbreak as stated in the bulletin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutbreakStatus {
    UnderSurveillance,
    UnderControl,
    UnderInvestigation,
    #[default]
    Unknown,
}

impl OutbreakStatus {
    /// Map the word following "under" to a status.
    ///
    /// Prefix matching absorbs OCR truncation ("under surv", "under contro").
    pub fn from_word(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        if word.starts_with("surv") {
            Some(Self::UnderSurveillance)
        } else if word.starts_with("contr") || word.starts_with("cntrl") {
            Some(Self::UnderControl)
        } else if word.starts_with("invest") || word.starts_with("invst") {
            Some(Self::UnderInvestigation)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderSurveillance => "under surveillance",
            Self::UnderControl => "under control",
            Self::UnderInvestigation => "under investigation",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OutbreakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field was resolved, tried and missed, or not tried at all.
///
/// A field can be `Resolved` with an empty value: a pre-2016 record that is
/// ongoing has no report date, and that is the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    Resolved,
    Unresolved,
    #[default]
    NotAttempted,
}

impl Resolution {
    pub fn from_found(found: bool) -> Self {
        if found { Self::Resolved } else { Self::Unresolved }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Which district list a district was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupScope {
    /// Districts of the already-resolved state.
    State,
    /// Every district in the gazetteer; lower precision.
    National,
}

/// Per-field resolution flags of a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResolutions {
    pub id_code: Resolution,
    pub state: Resolution,
    pub district: Resolution,
    pub disease: Resolution,
    pub counts: Resolution,
    pub start_date: Resolution,
    pub report_date: Resolution,
    pub status: Resolution,
    pub comments: Resolution,
    /// Scope used for district lookup, when one was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_scope: Option<LookupScope>,
}

/// One outbreak, as assembled from a record span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Unique ID printed in post-2016 bulletins.
    pub id_code: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub disease: Option<String>,
    pub cases: Option<u32>,
    pub deaths: Option<u32>,
    /// Either count carried the provisional `*` marker.
    pub provisional_counts: bool,
    /// Date of start of outbreak, `d-m-y`.
    pub start_date: Option<String>,
    /// Date of reporting, `d-m-y`. `None` with a start date means ongoing.
    pub report_date: Option<String>,
    pub status: OutbreakStatus,
    pub comments: String,
    /// Record span text, whitespace as in the dump.
    pub raw_text: String,
    pub source_file: String,
    pub resolution: FieldResolutions,
}

/// Report date column value for an outbreak with no end date.
pub const ONGOING: &str = "ongoing";

impl CanonicalRecord {
    /// Report date for display; "ongoing" once a start date is known.
    pub fn report_date_or_ongoing(&self) -> Option<&str> {
        match (&self.report_date, &self.start_date) {
            (Some(date), _) => Some(date),
            (None, Some(_)) => Some(ONGOING),
            (None, None) => None,
        }
    }

    /// Flatten into the tabular output schema.
    pub fn to_row(&self) -> OutputRow {
        OutputRow {
            id_code: self.id_code.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            district: self.district.clone().unwrap_or_default(),
            disease: self.disease.clone().unwrap_or_default(),
            cases: self.cases,
            deaths: self.deaths,
            start_date: self.start_date.clone().unwrap_or_default(),
            report_date: self.report_date_or_ongoing().unwrap_or_default().to_string(),
            status: self.status.as_str().to_string(),
            comments: self.comments.clone(),
            raw_text: collapse_whitespace(&self.raw_text),
            source_file: self.source_file.clone(),
        }
    }
}

/// Output table row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub id_code: String,
    pub state: String,
    pub district: String,
    pub disease: String,
    pub cases: Option<u32>,
    pub deaths: Option<u32>,
    pub start_date: String,
    pub report_date: String,
    pub status: String,
    pub comments: String,
    pub raw_text: String,
    pub source_file: String,
}

impl OutputRow {
    /// Column names, in order.
    pub const COLUMNS: [&'static str; 12] = [
        "id_code",
        "state",
        "district",
        "disease",
        "cases",
        "deaths",
        "start_date",
        "report_date",
        "status",
        "comments",
        "raw_text",
        "source_file",
    ];
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> CanonicalRecord {
        CanonicalRecord {
            id_code: None,
            state: None,
            district: None,
            disease: Some("MALARIA".to_string()),
            cases: Some(4),
            deaths: Some(0),
            provisional_counts: false,
            start_date: Some("02-01-15".to_string()),
            report_date: None,
            status: OutbreakStatus::Unknown,
            comments: String::new(),
            raw_text: "1. Odisha\n Koraput  Malaria".to_string(),
            source_file: "wk02.txt".to_string(),
            resolution: FieldResolutions::default(),
        }
    }

    #[test]
    fn test_status_from_word() {
        assert_eq!(OutbreakStatus::from_word("Control"), Some(OutbreakStatus::UnderControl));
        assert_eq!(OutbreakStatus::from_word("surveillance"), Some(OutbreakStatus::UnderSurveillance));
        assert_eq!(OutbreakStatus::from_word("INVESTIGATION"), Some(OutbreakStatus::UnderInvestigation));
        assert_eq!(OutbreakStatus::from_word("the"), None);
    }

    #[test]
    fn test_missing_report_date_is_ongoing() {
        let record = record();
        assert_eq!(record.report_date_or_ongoing(), Some(ONGOING));

        let row = record.to_row();
        assert_eq!(row.report_date, "ongoing");
        assert_eq!(row.raw_text, "1. Odisha Koraput Malaria");
        assert_eq!(row.status, "unknown");
    }

    #[test]
    fn test_no_dates_no_ongoing() {
        let mut record = record();
        record.start_date = None;
        assert_eq!(record.report_date_or_ongoing(), None);
    }
}
