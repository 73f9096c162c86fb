//! Rule-based field extractors for bulletin records.

pub mod counts;
pub mod dates;
pub mod id_code;
pub mod patterns;
pub mod status;

pub use counts::{CountPair, CountPairExtractor};
pub use dates::{normalize_date, DateExtractor, OutbreakDates, extract_dates};
pub use id_code::{normalize_id_code, IdCodeExtractor};
pub use status::{StatusExtractor, StatusToken};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in record text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the match in the searched text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.position.0
    }

    pub fn end(&self) -> usize {
        self.position.1
    }

    /// Shift the position by `offset`, for matches found in a suffix of the record.
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.position = (self.position.0 + offset, self.position.1 + offset);
        self
    }
}

/// Outcome of extracting one field from one record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome<T> {
    /// The field was found and parsed.
    Found(T),
    /// The field's pattern did not occur.
    Missing,
    /// The pattern occurred but the text could not be interpreted.
    Malformed { raw: String },
    /// The field does not exist in this record's layout.
    Skipped,
}

impl<T> FieldOutcome<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldOutcome::Found(v),
            None => FieldOutcome::Missing,
        }
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            FieldOutcome::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<T> {
        match self {
            FieldOutcome::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldOutcome::Found(_))
    }
}
