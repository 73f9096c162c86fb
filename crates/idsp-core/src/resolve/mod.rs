//! Gazetteer-based name resolution.
//!
//! Matching is layered: each field runs a [`MatcherChain`] of strategies and
//! the first strategy that accepts a candidate decides the field. A field no
//! strategy accepts stays unresolved.

mod matcher;
mod resolver;
mod similarity;

pub use matcher::{
    ExactContainment, FuzzyTokenOverlap, MatchMethod, MatchStrategy, MatchText, MatcherChain, NameMatch,
};
pub use resolver::{LocationDiseaseResolver, ResolvedFields, ResolvedName};
pub use similarity::{ratio, token_overlap_score, tokenize};
