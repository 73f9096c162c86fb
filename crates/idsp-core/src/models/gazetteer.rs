//! Canonical vocabularies of states, districts and diseases.
//!
//! Entry order is significant: exact containment takes the first entry that
//! appears in the text, so more specific names must be listed before the
//! shorter names they contain ("WEST BENGAL" before "BENGAL").

use std::collections::HashMap;

use crate::error::GazetteerError;

/// A canonical name together with its matching key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    /// Name as given in the vocabulary file.
    pub canonical: String,
    /// Upper-cased, whitespace-collapsed form used for matching.
    pub normalized: String,
}

impl GazetteerEntry {
    pub fn new(canonical: impl Into<String>) -> Self {
        let canonical = canonical.into().trim().to_string();
        let normalized = normalize_name(&canonical);
        Self { canonical, normalized }
    }
}

/// Read-only lookup tables shared by every worker.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    states: Vec<GazetteerEntry>,
    districts_by_state: HashMap<String, Vec<GazetteerEntry>>,
    national_districts: Vec<GazetteerEntry>,
    diseases: Vec<GazetteerEntry>,
}

impl Gazetteer {
    /// Build a gazetteer from in-memory lists.
    ///
    /// Districts are `(state, district)` pairs; a district without a state is
    /// only reachable through the national list.
    pub fn new<S, D, X>(states: S, districts: D, diseases: X) -> Result<Self, GazetteerError>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        D: IntoIterator<Item = (Option<String>, String)>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        let states = dedup_entries(states.into_iter().map(GazetteerEntry::new));
        let diseases = dedup_entries(diseases.into_iter().map(GazetteerEntry::new));

        let mut districts_by_state: HashMap<String, Vec<GazetteerEntry>> = HashMap::new();
        let mut national = Vec::new();
        for (state, district) in districts {
            let entry = GazetteerEntry::new(district);
            if entry.normalized.is_empty() {
                continue;
            }
            if let Some(state) = state {
                let bucket = districts_by_state.entry(normalize_name(&state)).or_default();
                if !bucket.iter().any(|e| e.normalized == entry.normalized) {
                    bucket.push(entry.clone());
                }
            }
            national.push(entry);
        }
        let national_districts = dedup_entries(national);

        if states.is_empty() {
            return Err(GazetteerError::EmptyVocabulary("state"));
        }
        if national_districts.is_empty() {
            return Err(GazetteerError::EmptyVocabulary("district"));
        }
        if diseases.is_empty() {
            return Err(GazetteerError::EmptyVocabulary("disease"));
        }

        Ok(Self {
            states,
            districts_by_state,
            national_districts,
            diseases,
        })
    }

    /// Build a gazetteer from the contents of the three vocabulary files.
    ///
    /// States and diseases are one name per line. District lines are either
    /// `STATE<TAB>DISTRICT` or a bare `DISTRICT`. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn from_vocabularies(
        states: &str,
        districts: &str,
        diseases: &str,
    ) -> Result<Self, GazetteerError> {
        let mut district_pairs = Vec::new();
        for (idx, line) in districts.lines().enumerate() {
            let Some(trimmed) = vocabulary_line(line) else {
                continue;
            };
            match line.trim_end_matches('\r').split_once('\t') {
                Some((state, district)) => {
                    if district.trim().is_empty() {
                        return Err(GazetteerError::MalformedDistrict {
                            line: idx + 1,
                            content: trimmed.to_string(),
                        });
                    }
                    let state = state.trim();
                    let state = (!state.is_empty()).then(|| state.to_string());
                    district_pairs.push((state, district.trim().to_string()));
                }
                None => district_pairs.push((None, trimmed.to_string())),
            }
        }

        Self::new(
            states.lines().filter_map(vocabulary_line),
            district_pairs,
            diseases.lines().filter_map(vocabulary_line),
        )
    }

    pub fn states(&self) -> &[GazetteerEntry] {
        &self.states
    }

    pub fn diseases(&self) -> &[GazetteerEntry] {
        &self.diseases
    }

    /// Every district, in file order, without duplicates.
    pub fn national_districts(&self) -> &[GazetteerEntry] {
        &self.national_districts
    }

    /// Districts listed under `state`, matched case-insensitively.
    pub fn districts_of(&self, state: &str) -> Option<&[GazetteerEntry]> {
        self.districts_by_state
            .get(&normalize_name(state))
            .map(Vec::as_slice)
    }

    pub fn is_disease(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.diseases.iter().any(|e| e.normalized == key)
    }

    /// True when `district` is listed under `state`.
    pub fn state_has_district(&self, state: &str, district: &str) -> bool {
        let key = normalize_name(district);
        self.districts_of(state)
            .is_some_and(|ds| ds.iter().any(|e| e.normalized == key))
    }
}

/// Upper-case and collapse whitespace, the form every match runs on.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn vocabulary_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some(trimmed)
}

fn dedup_entries(entries: impl IntoIterator<Item = GazetteerEntry>) -> Vec<GazetteerEntry> {
    let mut out: Vec<GazetteerEntry> = Vec::new();
    for entry in entries {
        if entry.normalized.is_empty() || out.iter().any(|e| e.normalized == entry.normalized) {
            continue;
        }
        out.push(entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STATES: &str = "WEST BENGAL\nMaharashtra\n\n# comment\nODISHA\n";
    const DISTRICTS: &str = "MAHARASHTRA\tSATARA\nMAHARASHTRA\tPUNE\nWest Bengal\tMALDA\nKORAPUT\n";
    const DISEASES: &str = "CHOLERA\nMALARIA\n";

    #[test]
    fn test_from_vocabularies() {
        let g = Gazetteer::from_vocabularies(STATES, DISTRICTS, DISEASES).unwrap();

        let states: Vec<_> = g.states().iter().map(|e| e.canonical.as_str()).collect();
        assert_eq!(states, vec!["WEST BENGAL", "Maharashtra", "ODISHA"]);
        assert_eq!(g.states()[1].normalized, "MAHARASHTRA");

        let pune: Vec<_> = g
            .districts_of("maharashtra")
            .unwrap()
            .iter()
            .map(|e| e.canonical.as_str())
            .collect();
        assert_eq!(pune, vec!["SATARA", "PUNE"]);
        assert_eq!(g.national_districts().len(), 4);
        assert!(g.districts_of("ODISHA").is_none());
    }

    #[test]
    fn test_state_has_district() {
        let g = Gazetteer::from_vocabularies(STATES, DISTRICTS, DISEASES).unwrap();
        assert!(g.state_has_district("WEST BENGAL", "malda"));
        assert!(!g.state_has_district("WEST BENGAL", "SATARA"));
        assert!(g.is_disease("cholera"));
        assert!(!g.is_disease("DENGUE"));
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let err = Gazetteer::from_vocabularies(STATES, DISTRICTS, "\n# none\n").unwrap_err();
        assert_eq!(err, GazetteerError::EmptyVocabulary("disease"));
    }

    #[test]
    fn test_malformed_district_line() {
        let err = Gazetteer::from_vocabularies(STATES, "MAHARASHTRA\tSATARA\nODISHA\t \n", DISEASES)
            .unwrap_err();
        assert!(matches!(err, GazetteerError::MalformedDistrict { line: 2, .. }));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Andaman &  Nicobar\tIslands "), "ANDAMAN & NICOBAR ISLANDS");
    }
}
