//! Completeness metrics over assembled records.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::record::{CanonicalRecord, OutputRow};

/// Columns that are always filled from provenance and never counted as missing.
const PROVENANCE: [&str; 2] = ["raw_text", "source_file"];

/// Missing-value counts per output column and a histogram of how many
/// columns each record populates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub total_records: usize,
    /// Records with an empty value, per column, in column order.
    pub missing_by_column: Vec<(&'static str, usize)>,
    /// Number of populated columns -> number of records.
    pub populated_histogram: BTreeMap<usize, usize>,
}

impl CompletenessReport {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CanonicalRecord>) -> Self {
        let columns: Vec<&'static str> = OutputRow::COLUMNS
            .iter()
            .copied()
            .filter(|c| !PROVENANCE.contains(c))
            .collect();

        let mut missing = vec![0usize; columns.len()];
        let mut histogram = BTreeMap::new();
        let mut total = 0;

        for record in records {
            total += 1;
            let mut populated = 0;
            for (i, column) in columns.iter().enumerate() {
                if is_populated(record, column) {
                    populated += 1;
                } else {
                    missing[i] += 1;
                }
            }
            *histogram.entry(populated).or_insert(0) += 1;
        }

        Self {
            total_records: total,
            missing_by_column: columns.into_iter().zip(missing).collect(),
            populated_histogram: histogram,
        }
    }

    /// Number of columns each record is scored on.
    pub fn column_count(&self) -> usize {
        self.missing_by_column.len()
    }

    /// Share of populated cells, 0.0 - 1.0.
    pub fn mean_completeness(&self) -> f64 {
        let cells = self.total_records * self.column_count();
        if cells == 0 {
            return 0.0;
        }
        let missing: usize = self.missing_by_column.iter().map(|(_, n)| n).sum();
        (cells - missing) as f64 / cells as f64
    }
}

fn is_populated(record: &CanonicalRecord, column: &str) -> bool {
    match column {
        "id_code" => record.id_code.is_some(),
        "state" => record.state.is_some(),
        "district" => record.district.is_some(),
        "disease" => record.disease.is_some(),
        "cases" => record.cases.is_some(),
        "deaths" => record.deaths.is_some(),
        "start_date" => record.start_date.is_some(),
        "report_date" => record.report_date_or_ongoing().is_some(),
        "status" => record.resolution.status.is_resolved(),
        "comments" => !record.comments.is_empty(),
        _ => true,
    }
}

impl fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {}", self.total_records)?;
        writeln!(f, "Missing values:")?;
        for (column, n) in &self.missing_by_column {
            writeln!(f, "  {:<12} {}", column, n)?;
        }
        writeln!(f, "Populated columns per record:")?;
        for (populated, n) in &self.populated_histogram {
            writeln!(f, "  {:>2}/{} {}", populated, self.column_count(), n)?;
        }
        write!(f, "Mean completeness: {:.1}%", self.mean_completeness() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{FieldResolutions, OutbreakStatus, Resolution};
    use pretty_assertions::assert_eq;

    fn record(district: Option<&str>, status: Option<OutbreakStatus>) -> CanonicalRecord {
        CanonicalRecord {
            id_code: Some("MH/SAT/16/05/001".to_string()),
            state: Some("MAHARASHTRA".to_string()),
            district: district.map(str::to_string),
            disease: Some("CHOLERA".to_string()),
            cases: Some(12),
            deaths: Some(2),
            provisional_counts: false,
            start_date: Some("14-03-16".to_string()),
            report_date: None,
            status: status.unwrap_or_default(),
            comments: "Team visited".to_string(),
            raw_text: "MH/SAT/16/05/001 ...".to_string(),
            source_file: "wk11.txt".to_string(),
            resolution: FieldResolutions {
                status: Resolution::from_found(status.is_some()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_missing_counts_and_histogram() {
        let records = vec![
            record(Some("SATARA"), Some(OutbreakStatus::UnderControl)),
            record(None, Some(OutbreakStatus::UnderControl)),
            record(None, None),
        ];
        let report = CompletenessReport::from_records(&records);

        assert_eq!(report.total_records, 3);
        assert_eq!(report.column_count(), 10);
        let missing: BTreeMap<_, _> = report.missing_by_column.iter().cloned().collect();
        assert_eq!(missing["district"], 2);
        assert_eq!(missing["status"], 1);
        assert_eq!(missing["report_date"], 0);
        assert_eq!(
            report.populated_histogram,
            BTreeMap::from([(8, 1), (9, 1), (10, 1)])
        );
        assert!((report.mean_completeness() - 27.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let report = CompletenessReport::from_records(std::iter::empty());
        assert_eq!(report.total_records, 0);
        assert_eq!(report.mean_completeness(), 0.0);
    }
}
