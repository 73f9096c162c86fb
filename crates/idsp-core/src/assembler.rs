//! Assembly of parsed and resolved fields into canonical records.

use serde::Serialize;

use crate::bulletin::rules::FieldOutcome;
use crate::bulletin::ParsedFields;
use crate::models::record::{
    CanonicalRecord, FieldResolutions, OutbreakStatus, OutputRow, RawRecord, Resolution,
};
use crate::resolve::ResolvedFields;

fn outcome_resolution<T>(outcome: &FieldOutcome<T>) -> Resolution {
    match outcome {
        FieldOutcome::Found(_) => Resolution::Resolved,
        FieldOutcome::Missing | FieldOutcome::Malformed { .. } => Resolution::Unresolved,
        FieldOutcome::Skipped => Resolution::NotAttempted,
    }
}

/// Builds [`CanonicalRecord`]s with provenance and resolution flags.
#[derive(Debug, Clone, Default)]
pub struct RecordAssembler;

impl RecordAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(
        &self,
        record: &RawRecord<'_>,
        parsed: ParsedFields,
        resolved: ResolvedFields,
    ) -> CanonicalRecord {
        let resolution = FieldResolutions {
            id_code: outcome_resolution(&parsed.id_code),
            state: Resolution::from_found(resolved.state.is_some()),
            district: match resolved.district_scope {
                Some(_) => Resolution::from_found(resolved.district.is_some()),
                None => Resolution::NotAttempted,
            },
            disease: Resolution::from_found(resolved.disease.is_some()),
            counts: outcome_resolution(&parsed.counts),
            start_date: outcome_resolution(&parsed.dates),
            // A start date without a report date is an ongoing outbreak, not a miss
            report_date: outcome_resolution(&parsed.dates),
            status: outcome_resolution(&parsed.status),
            comments: outcome_resolution(&parsed.comments),
            district_scope: resolved.district_scope,
        };

        let counts = parsed.counts.into_found();
        let dates = parsed.dates.into_found();

        CanonicalRecord {
            id_code: parsed.id_code.into_found(),
            state: resolved.state.map(|r| r.name),
            district: resolved.district.map(|r| r.name),
            disease: resolved.disease.map(|r| r.name),
            cases: counts.map(|c| c.cases),
            deaths: counts.map(|c| c.deaths),
            provisional_counts: counts.is_some_and(|c| c.provisional),
            start_date: dates.as_ref().map(|d| d.start.clone()),
            report_date: dates.and_then(|d| d.report),
            status: parsed.status.into_found().unwrap_or(OutbreakStatus::Unknown),
            comments: parsed.comments.into_found().unwrap_or_default(),
            raw_text: record.text().to_string(),
            source_file: record.source_file().to_string(),
            resolution,
        }
    }
}

/// Output collection; row identity is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    records: Vec<CanonicalRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CanonicalRecord) {
        self.records.push(record);
    }

    /// Append another set after the records already held.
    pub fn append(&mut self, other: RecordSet) {
        self.records.extend(other.records);
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record carrying `id_code`, in insertion order.
    ///
    /// Initial and follow-up reports of one outbreak may share an ID; all of
    /// them are returned and no merging is attempted.
    pub fn by_id_code<'s>(&'s self, id_code: &'s str) -> impl Iterator<Item = &'s CanonicalRecord> + 's {
        self.records
            .iter()
            .filter(move |r| r.id_code.as_deref() == Some(id_code))
    }

    /// Rows in output schema order.
    pub fn rows(&self) -> Vec<OutputRow> {
        self.records.iter().map(CanonicalRecord::to_row).collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
