//! Matcher strategies and the ordered chain that runs them.

use std::collections::HashSet;
use std::fmt;

use super::similarity::{token_overlap_score, tokenize};
use crate::models::config::FuzzyMode;
use crate::models::gazetteer::{normalize_name, GazetteerEntry};

/// Record text prepared once for all matchers.
#[derive(Debug, Clone)]
pub struct MatchText {
    normalized: String,
    tokens: Vec<String>,
    token_set: HashSet<String>,
}

impl MatchText {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let token_set = tokens.iter().cloned().collect();
        Self {
            normalized: normalize_name(text),
            tokens,
            token_set,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// How a name was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Exact,
    Fuzzy,
}

/// An accepted gazetteer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch<'g> {
    pub entry: &'g GazetteerEntry,
    /// 100 for exact matches.
    pub score: u8,
    pub method: MatchMethod,
}

/// One tier of name matching.
pub trait MatchStrategy: fmt::Debug + Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Return an accepted candidate, or `None` to let the next strategy try.
    fn find<'g>(&self, text: &MatchText, candidates: &'g [GazetteerEntry]) -> Option<NameMatch<'g>>;
}

/// Literal containment, first entry in gazetteer order wins.
///
/// An entry matches when its normalized name is a substring of the text, or
/// when every one of its tokens appears somewhere in the text.
#[derive(Debug, Clone, Default)]
pub struct ExactContainment;

impl MatchStrategy for ExactContainment {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find<'g>(&self, text: &MatchText, candidates: &'g [GazetteerEntry]) -> Option<NameMatch<'g>> {
        candidates
            .iter()
            .find(|entry| {
                text.normalized.contains(&entry.normalized) || {
                    let tokens = tokenize(&entry.normalized);
                    !tokens.is_empty() && tokens.iter().all(|t| text.token_set.contains(t))
                }
            })
            .map(|entry| NameMatch {
                entry,
                score: 100,
                method: MatchMethod::Exact,
            })
    }
}

/// Best token-overlap score, accepted only at or above `threshold`.
#[derive(Debug, Clone)]
pub struct FuzzyTokenOverlap {
    threshold: u8,
}

impl FuzzyTokenOverlap {
    pub fn new(threshold: u8) -> Self {
        Self { threshold: threshold.min(100) }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl MatchStrategy for FuzzyTokenOverlap {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn find<'g>(&self, text: &MatchText, candidates: &'g [GazetteerEntry]) -> Option<NameMatch<'g>> {
        let mut best: Option<(&GazetteerEntry, u8)> = None;
        for entry in candidates {
            let score = token_overlap_score(&tokenize(&entry.normalized), &text.tokens);
            // Strictly greater keeps the earlier entry on ties
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((entry, score));
            }
        }

        best.filter(|&(_, score)| score >= self.threshold)
            .map(|(entry, score)| NameMatch {
                entry,
                score,
                method: MatchMethod::Fuzzy,
            })
    }
}

/// Strategies tried in order; the first one that accepts wins.
#[derive(Debug, Default)]
pub struct MatcherChain {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl MatcherChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the end of the chain.
    pub fn with(mut self, strategy: impl MatchStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Exact containment only.
    pub fn exact() -> Self {
        Self::new().with(ExactContainment)
    }

    /// Chain for a fuzzy mode and acceptance threshold.
    pub fn for_mode(mode: FuzzyMode, threshold: u8) -> Self {
        match mode {
            FuzzyMode::Fallback => Self::exact().with(FuzzyTokenOverlap::new(threshold)),
            FuzzyMode::Always => Self::new().with(FuzzyTokenOverlap::new(threshold)),
            FuzzyMode::ExactOnly => Self::exact(),
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn resolve<'g>(&self, text: &MatchText, candidates: &'g [GazetteerEntry]) -> Option<NameMatch<'g>> {
        self.strategies.iter().find_map(|s| s.find(text, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(names: &[&str]) -> Vec<GazetteerEntry> {
        names.iter().map(|n| GazetteerEntry::new(*n)).collect()
    }

    #[test]
    fn test_exact_respects_list_order() {
        let states = entries(&["WEST BENGAL", "BENGAL"]);
        let text = MatchText::new("Malda, West Bengal, Measles");
        let m = ExactContainment.find(&text, &states).unwrap();
        assert_eq!(m.entry.canonical, "WEST BENGAL");
        assert_eq!(m.method, MatchMethod::Exact);
    }

    #[test]
    fn test_exact_token_set_membership() {
        let states = entries(&["ANDAMAN & NICOBAR ISLANDS", "TAMIL NADU"]);
        let text = MatchText::new("Nadu\nTamil Madurai");
        let m = ExactContainment.find(&text, &states).unwrap();
        assert_eq!(m.entry.canonical, "TAMIL NADU");
    }

    #[test]
    fn test_fuzzy_threshold() {
        let states = entries(&["KERALA", "KARNATAKA"]);
        let text = MatchText::new("KL/TRC/17/03/012 Kerla Thrissur");

        let accepted = FuzzyTokenOverlap::new(85).find(&text, &states).unwrap();
        assert_eq!(accepted.entry.canonical, "KERALA");
        assert_eq!(accepted.score, 91);

        assert!(FuzzyTokenOverlap::new(95).find(&text, &states).is_none());
    }

    #[test]
    fn test_chain_falls_through() {
        let chain = MatcherChain::for_mode(FuzzyMode::Fallback, 85);
        assert_eq!(chain.strategy_names(), vec!["exact", "fuzzy"]);

        let states = entries(&["KERALA"]);
        let m = chain.resolve(&MatchText::new("Kerla"), &states).unwrap();
        assert_eq!(m.method, MatchMethod::Fuzzy);

        let exact_only = MatcherChain::for_mode(FuzzyMode::ExactOnly, 85);
        assert!(exact_only.resolve(&MatchText::new("Kerla"), &states).is_none());
    }
}
