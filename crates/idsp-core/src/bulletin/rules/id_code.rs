//! Unique ID extraction for post-2016 records.

use super::patterns::ID_CODE;
use super::{ExtractionMatch, FieldExtractor};

/// Unique ID field extractor.
pub struct IdCodeExtractor;

impl IdCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        ID_CODE
            .find(text)
            .map(|m| ExtractionMatch::new(normalize_id_code(m.as_str()), m.start(), m.end(), m.as_str()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ID_CODE
            .find_iter(text)
            .map(|m| ExtractionMatch::new(normalize_id_code(m.as_str()), m.start(), m.end(), m.as_str()))
            .collect()
    }
}

/// Drop the stray spaces OCR leaves around the slashes.
pub fn normalize_id_code(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
