//! Era detection from the most frequent 4-digit number in a dump.

use std::collections::HashMap;

use tracing::debug;

use super::rules::FOUR_DIGITS;
use crate::models::config::SegmentationConfig;
use crate::models::record::{Era, EraDetection};

/// Classifies a dump as pre- or post-2016 layout.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    boundary_year: u32,
    fallback_era: Era,
}

impl FormatDetector {
    pub fn new(boundary_year: u32, fallback_era: Era) -> Self {
        Self { boundary_year, fallback_era }
    }

    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.era_boundary_year, config.fallback_era)
    }

    /// Detect the era of `text`.
    ///
    /// The reference year is the mode of all 4-digit substrings; among equal
    /// counts the value seen first wins. A tie or an absence of years marks
    /// the detection ambiguous.
    pub fn detect(&self, text: &str) -> EraDetection {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (order, m) in FOUR_DIGITS.find_iter(text).enumerate() {
            counts.entry(m.as_str()).or_insert((0, order)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> =
            counts.into_iter().map(|(y, (n, first))| (y, n, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let Some(&(year, top, _)) = ranked.first() else {
            debug!("No 4-digit year found, assuming {}", self.fallback_era);
            return EraDetection {
                era: self.fallback_era,
                reference_year: None,
                ambiguous: true,
            };
        };

        let tied = ranked.get(1).is_some_and(|&(_, n, _)| n == top);
        // Four ASCII digits always parse
        let year: u32 = year.parse().unwrap_or(0);
        let era = if year >= self.boundary_year { Era::Post2016 } else { Era::Pre2016 };

        debug!("Reference year {} ({} occurrences, tied: {}) -> {}", year, top, tied, era);

        EraDetection {
            era,
            reference_year: Some(year),
            ambiguous: tied,
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_year() {
        let text = "Week 10 2017 ... reported 2017, published 2016, 2017";
        let d = FormatDetector::default().detect(text);
        assert_eq!(d.reference_year, Some(2017));
        assert_eq!(d.era, Era::Post2016);
        assert!(!d.ambiguous);
    }

    #[test]
    fn test_pre_2016() {
        let d = FormatDetector::default().detect("IDSP weekly outbreaks 2012 ... 2012 ... 2011");
        assert_eq!(d.era, Era::Pre2016);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let d = FormatDetector::default().detect("2015 2016 2016 2015");
        assert_eq!(d.reference_year, Some(2015));
        assert_eq!(d.era, Era::Pre2016);
        assert!(d.ambiguous);
    }

    #[test]
    fn test_no_year_uses_fallback() {
        let d = FormatDetector::new(2016, Era::Pre2016).detect("no numbers here");
        assert_eq!(d.era, Era::Pre2016);
        assert_eq!(d.reference_year, None);
        assert!(d.ambiguous);
    }
}
