use std::sync::Arc;

use idsp_core::bulletin::rules::ID_CODE;
use idsp_core::bulletin::SegmentStrategy;
use idsp_core::{
    BatchProcessor, DumpInput, FailureKind, Gazetteer, IdspConfig, OutbreakStatus, OutputRow,
};
use pretty_assertions::assert_eq;

const STATES: &str = "\
MAHARASHTRA
WEST BENGAL
ODISHA
KERALA
ASSAM
";

const DISTRICTS: &str = "\
MAHARASHTRA\tSATARA
MAHARASHTRA\tPUNE
WEST BENGAL\tMALDA
ODISHA\tKORAPUT
KERALA\tTHRISSUR
ASSAM\tDHUBRI
";

const DISEASES: &str = "\
ACUTE DIARRHOEAL DISEASE
CHOLERA
MEASLES
MALARIA
DENGUE
";

const POST_2016: &str = "\
Weekly Outbreaks 2016
Unique ID State District Disease Cases Deaths Start Report Status Comments
MH/SAT/16/05/001 Maharashtra Satara Cholera 12 2 14-03-16 20-03-16 Under Control Team visited.
WB/MLD/16/05/002 West Bengal Malda Measles 7 0 15-03-16 Under Surveillance Vaccination done.
OR/KRP/16/05/003 Odisha Koraput Malaria 45 1 10-03-16 Under Investigation Samples sent.
KL/TRC/16/05/004 Kerala Thrissur Dengue
";

const PRE_2012: &str = "\
Disease outbreaks reported 2012 week 1, 2012
1. Assam Dhubri Cholera 12 0 02.01.12 Under control. Chlorination done.
2. Odisha Koraput Malaria 4 0 03.01.12 Under surveillance
3. Odisha no details received
";

fn processor() -> BatchProcessor {
    let gazetteer = Gazetteer::from_vocabularies(STATES, DISTRICTS, DISEASES).unwrap();
    BatchProcessor::new(Arc::new(gazetteer), &IdspConfig::default())
}

#[test]
fn test_record_count_equals_anchor_count() {
    let output = processor().process_text("2016_wk05.txt", POST_2016);
    let anchors = ID_CODE.find_iter(POST_2016).count();

    // The Kerala row has no date and no counts, so it is logged instead of emitted
    assert_eq!(anchors, 4);
    assert_eq!(output.records.len() + output.errors.failed_records().len(), anchors);
    assert_eq!(output.records.len(), 3);
}

#[test]
fn test_malformed_records_go_to_failure_log() {
    let output = processor().process_batch(&[
        DumpInput::new("2016_wk05.txt", POST_2016),
        DumpInput::new("2012_wk01.txt", PRE_2012),
    ]);

    // 4 + 3 records, one malformed in each dump
    assert_eq!(output.records.len(), 5);
    assert_eq!(output.errors.failed_records().len(), 2);
    assert_eq!(output.errors.count(FailureKind::RecordUnparseable), 2);

    let failed: Vec<&str> = output
        .errors
        .failed_records()
        .iter()
        .map(|r| r.source_file.as_str())
        .collect();
    assert_eq!(failed, vec!["2016_wk05.txt", "2012_wk01.txt"]);
    assert!(output.errors.failed_records()[1].raw_text.contains("no details received"));
}

#[test]
fn test_post_2016_rows() {
    let output = processor().process_text("2016_wk05.txt", POST_2016);
    let records = output.records.records();

    let satara = &records[0];
    assert_eq!(satara.id_code.as_deref(), Some("MH/SAT/16/05/001"));
    assert_eq!(satara.state.as_deref(), Some("MAHARASHTRA"));
    assert_eq!(satara.district.as_deref(), Some("SATARA"));
    assert_eq!(satara.disease.as_deref(), Some("CHOLERA"));
    assert_eq!((satara.cases, satara.deaths), (Some(12), Some(2)));
    assert_eq!(satara.start_date.as_deref(), Some("14-03-16"));
    assert_eq!(satara.report_date.as_deref(), Some("20-03-16"));
    assert_eq!(satara.status, OutbreakStatus::UnderControl);
    assert_eq!(satara.comments, "Team visited.");

    let malda = &records[1];
    assert_eq!(malda.state.as_deref(), Some("WEST BENGAL"));
    assert_eq!(malda.district.as_deref(), Some("MALDA"));
    assert_eq!(malda.to_row().report_date, "ongoing");

    for record in records {
        if let (Some(state), Some(district)) = (&record.state, &record.district) {
            assert!(processor_gazetteer().state_has_district(state, district));
        }
    }
}

#[test]
fn test_rows_without_id_codes_keep_their_own_counts_and_dates() {
    let rows = "\
Satara Cholera 12 2 14-03-16 20-03-16 Under control Team visited.
Malda Measles 7 0 15-03-16 22-03-16 Under surveillance";

    for header in ["Weekly outbreaks 2016 2016\n", "Week 11 2016\n"] {
        let output = processor().process_text("2016_wk11.txt", &format!("{header}{rows}"));
        let records = output.records.records();

        assert_eq!(output.dumps[0].strategy, SegmentStrategy::CountDateGroups);
        assert_eq!(records.len(), 2, "header {header:?}");

        let satara = &records[0];
        assert_eq!(satara.district.as_deref(), Some("SATARA"));
        assert_eq!(satara.disease.as_deref(), Some("CHOLERA"));
        assert_eq!((satara.cases, satara.deaths), (Some(12), Some(2)));
        assert_eq!(satara.start_date.as_deref(), Some("14-03-16"));
        assert_eq!(satara.report_date.as_deref(), Some("20-03-16"));
        assert_eq!(satara.status, OutbreakStatus::UnderControl);

        let malda = &records[1];
        assert_eq!(malda.district.as_deref(), Some("MALDA"));
        assert_eq!(malda.disease.as_deref(), Some("MEASLES"));
        assert_eq!((malda.cases, malda.deaths), (Some(7), Some(0)));
        assert_eq!(malda.start_date.as_deref(), Some("15-03-16"));
        assert_eq!(malda.report_date.as_deref(), Some("22-03-16"));
        assert_eq!(malda.status, OutbreakStatus::UnderSurveillance);
    }
}

#[test]
fn test_pre_2016_rows() {
    let output = processor().process_text("2012_wk01.txt", PRE_2012);
    let records = output.records.records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id_code, None);
    assert_eq!(records[0].state.as_deref(), Some("ASSAM"));
    assert_eq!(records[0].district.as_deref(), Some("DHUBRI"));
    assert_eq!(records[0].start_date.as_deref(), Some("02-01-12"));
    assert_eq!(records[1].status, OutbreakStatus::UnderSurveillance);
    assert_eq!(output.errors.count(FailureKind::IdCodeMissing), 0);
}

#[test]
fn test_diseases_come_from_vocabulary() {
    let gazetteer = processor_gazetteer();
    let output = processor().process_batch(&[
        DumpInput::new("a.txt", POST_2016),
        DumpInput::new("b.txt", PRE_2012),
    ]);

    for record in output.records.iter() {
        if let Some(disease) = &record.disease {
            assert!(gazetteer.is_disease(disease), "{disease} not in vocabulary");
        }
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let inputs: Vec<DumpInput> = (0..6)
        .map(|i| {
            let text = if i % 2 == 0 { POST_2016 } else { PRE_2012 };
            DumpInput::new(format!("dump_{i}.txt"), text)
        })
        .collect();

    let processor = processor();
    let parallel = processor.process_batch(&inputs);

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut unparseable = 0;
    for input in &inputs {
        let single = processor.process_text(&input.source_file, &input.text);
        rows.extend(single.records.rows());
        unparseable += single.errors.count(FailureKind::RecordUnparseable);
    }

    assert_eq!(parallel.records.rows(), rows);
    assert_eq!(parallel.errors.count(FailureKind::RecordUnparseable), unparseable);
}

fn processor_gazetteer() -> Gazetteer {
    Gazetteer::from_vocabularies(STATES, DISTRICTS, DISEASES).unwrap()
}
