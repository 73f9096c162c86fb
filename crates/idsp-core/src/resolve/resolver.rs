//! Layered state, district and disease resolution against the gazetteer.

use std::sync::Arc;

use tracing::debug;

use super::matcher::{MatchMethod, MatchText, MatcherChain, NameMatch};
use crate::models::config::{DistrictScope, ResolutionConfig};
use crate::models::gazetteer::Gazetteer;
use crate::models::record::LookupScope;

/// A canonical name chosen for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub score: u8,
    pub method: MatchMethod,
}

impl From<NameMatch<'_>> for ResolvedName {
    fn from(m: NameMatch<'_>) -> Self {
        Self {
            name: m.entry.canonical.clone(),
            score: m.score,
            method: m.method,
        }
    }
}

/// Resolution result for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub state: Option<ResolvedName>,
    pub district: Option<ResolvedName>,
    /// District list that was searched; `None` when no lookup was attempted.
    pub district_scope: Option<LookupScope>,
    pub disease: Option<ResolvedName>,
}

impl ResolvedFields {
    pub fn district_attempted(&self) -> bool {
        self.district_scope.is_some()
    }
}

/// Maps record text to canonical names.
///
/// Holds a shared, read-only [`Gazetteer`]; cloning a resolver is cheap and
/// every worker may hold its own.
#[derive(Debug, Clone)]
pub struct LocationDiseaseResolver {
    gazetteer: Arc<Gazetteer>,
    state_chain: Arc<MatcherChain>,
    district_chain: Arc<MatcherChain>,
    disease_chain: Arc<MatcherChain>,
    district_scope: DistrictScope,
}

impl LocationDiseaseResolver {
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        Self::from_config(gazetteer, &ResolutionConfig::default())
    }

    pub fn from_config(gazetteer: Arc<Gazetteer>, config: &ResolutionConfig) -> Self {
        Self {
            gazetteer,
            state_chain: Arc::new(MatcherChain::for_mode(config.fuzzy_mode, config.state_threshold)),
            district_chain: Arc::new(MatcherChain::for_mode(
                config.fuzzy_mode,
                config.district_threshold,
            )),
            // Closed vocabulary: precision over recall
            disease_chain: Arc::new(MatcherChain::exact()),
            district_scope: config.district_scope,
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Resolve state, then district within the chosen scope, then disease.
    pub fn resolve(&self, text: &str) -> ResolvedFields {
        let text = MatchText::new(text);

        let state = self.state_chain.resolve(&text, self.gazetteer.states());
        let (district, district_scope) = self.resolve_district(&text, state.as_ref());
        let disease = self.disease_chain.resolve(&text, self.gazetteer.diseases());

        debug!(
            state = state.as_ref().map(|m| m.entry.canonical.as_str()),
            district = district.as_ref().map(|m| m.entry.canonical.as_str()),
            disease = disease.as_ref().map(|m| m.entry.canonical.as_str()),
            "resolved names"
        );

        ResolvedFields {
            state: state.map(ResolvedName::from),
            district: district.map(ResolvedName::from),
            district_scope,
            disease: disease.map(ResolvedName::from),
        }
    }

    fn resolve_district<'g>(
        &'g self,
        text: &MatchText,
        state: Option<&NameMatch<'g>>,
    ) -> (Option<NameMatch<'g>>, Option<LookupScope>) {
        let scoped = state.and_then(|s| self.gazetteer.districts_of(&s.entry.canonical));

        let (candidates, scope) = match (self.district_scope, scoped) {
            (DistrictScope::National, _) => (self.gazetteer.national_districts(), LookupScope::National),
            (_, Some(districts)) => (districts, LookupScope::State),
            (DistrictScope::StateOnly, None) => return (None, None),
            (DistrictScope::StateScoped, None) => {
                (self.gazetteer.national_districts(), LookupScope::National)
            }
        };

        (self.district_chain.resolve(text, candidates), Some(scope))
    }
}
