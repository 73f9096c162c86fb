//! Field extraction from one record span.
//!
//! Every field is extracted independently: a missing status never prevents
//! reading dates or counts, and so on. The parser does not decide whether a
//! record is kept; it reports outcomes and the pipeline counts them.

use std::ops::Range;

use tracing::trace;

use super::rules::{
    extract_dates, CountPair, CountPairExtractor, DateExtractor, FieldExtractor, FieldOutcome,
    IdCodeExtractor, OutbreakDates, StatusExtractor,
};
use crate::accumulator::FailureKind;
use crate::models::record::{collapse_whitespace, Era, OutbreakStatus, RawRecord};

/// Everything the rules could read from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFields {
    pub id_code: FieldOutcome<String>,
    pub dates: FieldOutcome<OutbreakDates>,
    pub counts: FieldOutcome<CountPair>,
    pub status: FieldOutcome<OutbreakStatus>,
    /// Text after the status token; skipped when there is no status token.
    pub comments: FieldOutcome<String>,
    /// End of the leading text holding state, district and disease names:
    /// the start of the case/death pair, else of the first date, else the
    /// record length.
    pub head_end: usize,
}

impl ParsedFields {
    /// No date and no case/death pair: nothing identifies this as an outbreak row.
    pub fn is_unparseable(&self) -> bool {
        !self.dates.is_found() && !self.counts.is_found()
    }

    /// Field-level failures to count for this record.
    pub fn failures(&self) -> Vec<FailureKind> {
        let mut kinds = Vec::new();
        if matches!(self.id_code, FieldOutcome::Missing) {
            kinds.push(FailureKind::IdCodeMissing);
        }
        if !self.dates.is_found() {
            kinds.push(FailureKind::DateMissing);
        }
        if !self.counts.is_found() {
            kinds.push(FailureKind::CountsMissing);
        }
        match self.status {
            FieldOutcome::Missing => kinds.push(FailureKind::StatusMissing),
            FieldOutcome::Malformed { .. } => kinds.push(FailureKind::StatusUnrecognized),
            _ => {}
        }
        kinds
    }

    /// Leading text of `record_text` up to `head_end`.
    pub fn head<'t>(&self, record_text: &'t str) -> &'t str {
        &record_text[..self.head_end.min(record_text.len())]
    }
}

/// Trait for record parsing.
pub trait RecordParser {
    /// Extract every field from one record span.
    fn parse(&self, record: &RawRecord<'_>) -> ParsedFields;
}

/// Regex rule parser for both bulletin layouts.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse free text as if it were a record of the given era.
    ///
    /// Status is searched only from `head_end` on. A record cut around a
    /// count/date group starts right after the previous row's group, so its
    /// head can still hold that row's status word.
    pub fn parse_text(&self, text: &str, era: Era) -> ParsedFields {
        let id_match = IdCodeExtractor::new().extract(text);
        let body_start = id_match.as_ref().map(|m| m.end()).unwrap_or(0);
        let body = &text[body_start..];

        let counts_match = CountPairExtractor::new()
            .extract(body)
            .map(|m| m.offset_by(body_start));

        let dates = extract_dates(body).map(|d| d.offset_by(body_start));

        let head_end = counts_match
            .as_ref()
            .map(|m| m.start())
            .or_else(|| dates.as_ref().map(|d| d.start_position.0))
            .unwrap_or(text.len());

        let (status, comments) = status_after(text, head_end);

        let parsed = ParsedFields {
            id_code: id_outcome(id_match.map(|m| m.value), era),
            dates: FieldOutcome::from_option(dates),
            counts: FieldOutcome::from_option(counts_match.map(|m| m.value)),
            status,
            comments,
            head_end,
        };

        trace!(?parsed, "parsed record");
        parsed
    }

    /// Parse a record cut around a count/date group at `group` in `text`.
    ///
    /// Counts and the start date come from the group itself, the report date
    /// and status from the text after it, and the ID code and names from the
    /// text before it. The rest of the span is shared with the neighbouring
    /// rows and is never read for counts or dates.
    pub fn parse_grouped(&self, text: &str, group: Range<usize>, era: Era) -> ParsedFields {
        let head = &text[..group.start];
        let tail = &text[group.end..];

        let id_code = IdCodeExtractor::new().extract(head).map(|m| m.value);

        let counts = CountPairExtractor::new()
            .extract(&text[group.clone()])
            .map(|m| m.value);

        let dates = DateExtractor::new()
            .extract(&text[group.clone()])
            .map(|start| OutbreakDates {
                start_position: (start.start() + group.start, start.end() + group.start),
                start: start.value,
                report: DateExtractor::new().extract(tail).map(|m| m.value),
            });

        let (status, comments) = status_after(text, group.end);

        let parsed = ParsedFields {
            id_code: id_outcome(id_code, era),
            dates: FieldOutcome::from_option(dates),
            counts: FieldOutcome::from_option(counts),
            status,
            comments,
            head_end: group.start,
        };

        trace!(?parsed, "parsed grouped record");
        parsed
    }
}

impl RecordParser for RuleBasedParser {
    fn parse(&self, record: &RawRecord<'_>) -> ParsedFields {
        match record.anchor_in_record() {
            Some(group) => self.parse_grouped(record.text(), group, record.era()),
            None => self.parse_text(record.text(), record.era()),
        }
    }
}

fn id_outcome(id_code: Option<String>, era: Era) -> FieldOutcome<String> {
    match (id_code, era) {
        (Some(id), _) => FieldOutcome::Found(id),
        (None, Era::Pre2016) => FieldOutcome::Skipped,
        (None, Era::Post2016) => FieldOutcome::Missing,
    }
}

/// Status token at or after `from`, and the collapsed text following it.
fn status_after(text: &str, from: usize) -> (FieldOutcome<OutbreakStatus>, FieldOutcome<String>) {
    match StatusExtractor::new()
        .extract(&text[from..])
        .map(|m| m.offset_by(from))
    {
        Some(m) => {
            let comments = collapse_whitespace(&text[m.end()..]);
            let status = match m.value.status {
                Some(status) => FieldOutcome::Found(status),
                None => FieldOutcome::Malformed { raw: m.value.word },
            };
            (status, FieldOutcome::Found(comments))
        }
        None => (FieldOutcome::Missing, FieldOutcome::Skipped),
    }
}
