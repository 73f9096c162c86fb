//! Case and death count extraction.

use super::patterns::COUNT_PAIR;
use super::{ExtractionMatch, FieldExtractor};

/// Cases and deaths printed side by side in one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPair {
    pub cases: u32,
    pub deaths: u32,
    /// Either number carried a trailing `*`.
    pub provisional: bool,
}

/// Case/death pair extractor.
pub struct CountPairExtractor;

impl CountPairExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CountPairExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CountPairExtractor {
    type Output = ExtractionMatch<CountPair>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in COUNT_PAIR.captures_iter(text) {
            // Digit runs too long for u32 are table noise, not counts
            let (Ok(cases), Ok(deaths)) = (caps[2].parse::<u32>(), caps[4].parse::<u32>()) else {
                continue;
            };
            let Some(pair) = caps.get(1) else {
                continue;
            };
            let value = CountPair {
                cases,
                deaths,
                provisional: !caps[3].is_empty() || !caps[5].is_empty(),
            };
            results.push(ExtractionMatch::new(value, pair.start(), pair.end(), pair.as_str()));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_pair() {
        let m = CountPairExtractor::new()
            .extract("SATARA CHOLERA 12 2 14-03-16 20-03-16")
            .unwrap();
        assert_eq!(
            m.value,
            CountPair { cases: 12, deaths: 2, provisional: false }
        );
        assert_eq!(m.source, "12 2");
    }

    #[test]
    fn test_slash_separated_and_provisional() {
        let m = CountPairExtractor::new()
            .extract("Dengue 34*/ 1 08.09.15")
            .unwrap();
        assert_eq!(m.value.cases, 34);
        assert_eq!(m.value.deaths, 1);
        assert!(m.value.provisional);
    }

    #[test]
    fn test_no_pair() {
        assert!(CountPairExtractor::new().extract("Cholera cases reported").is_none());
    }

    #[test]
    fn test_overflowing_digits_skipped() {
        let m = CountPairExtractor::new()
            .extract("x 99999999999 1 then 5 0 end")
            .unwrap();
        assert_eq!(m.value.cases, 5);
    }
}
