//! Outbreak status extraction ("Under control", "Under surveillance", ...).

use super::patterns::STATUS;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::record::OutbreakStatus;

/// The "under <word>" token of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusToken {
    /// Word following "under", as printed.
    pub word: String,
    /// Recognized status, `None` for an unknown word.
    pub status: Option<OutbreakStatus>,
}

/// Status field extractor.
pub struct StatusExtractor;

impl StatusExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatusExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StatusExtractor {
    type Output = ExtractionMatch<StatusToken>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        STATUS
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let word = caps[1].to_string();
                let token = StatusToken {
                    status: OutbreakStatus::from_word(&word),
                    word,
                };
                Some(ExtractionMatch::new(token, full.start(), full.end(), full.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let m = StatusExtractor::new()
            .extract("20-03-16 UNDER CONTROL Cases treated")
            .unwrap();
        assert_eq!(m.value.status, Some(OutbreakStatus::UnderControl));
        assert_eq!(m.source, "UNDER CONTROL");
    }

    #[test]
    fn test_unknown_word_kept() {
        let m = StatusExtractor::new().extract("under review").unwrap();
        assert_eq!(m.value.word, "review");
        assert_eq!(m.value.status, None);
    }

    #[test]
    fn test_missing() {
        assert!(StatusExtractor::new().extract("Cholera 12 2 14-03-16").is_none());
    }
}
