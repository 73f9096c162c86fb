//! Date extraction for bulletin records.
//!
//! Dates are kept as printed (day, month, year digits) and only the
//! separator is normalized to `-`; the bulletins mix two- and four-digit
//! years and OCR often splits or doubles the separators.

use super::patterns::{DATE, DATE_PARTS};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE.captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let normalized = normalize_date(m.as_str())?;
                Some(ExtractionMatch::new(normalized, m.start(), m.end(), m.as_str()))
            })
            .collect()
    }
}

/// Start and report dates of an outbreak.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutbreakDates {
    /// Date of start of outbreak (first date in the record).
    pub start: String,
    /// Date of reporting (second date); `None` means ongoing.
    pub report: Option<String>,
    /// Byte range of the first date within the searched text.
    pub start_position: (usize, usize),
}

impl OutbreakDates {
    /// Shift the start position by `offset`, for dates found in a suffix of the record.
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.start_position = (self.start_position.0 + offset, self.start_position.1 + offset);
        self
    }
}

/// Extract start and report dates; `None` when the record has no date.
pub fn extract_dates(text: &str) -> Option<OutbreakDates> {
    let mut dates = DateExtractor::new().extract_all(text).into_iter();
    let first = dates.next()?;
    Some(OutbreakDates {
        start_position: first.position,
        start: first.value,
        report: dates.next().map(|m| m.value),
    })
}

/// Normalize a date to `d-m-y`, keeping the digits as written.
///
/// Idempotent: a normalized date normalizes to itself.
pub fn normalize_date(raw: &str) -> Option<String> {
    let caps = DATE_PARTS.captures(raw)?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}
